//! Options files.
//!
//! An options file is a JSON object using the `camelCase` option names.
//! Line and block comments and trailing commas are accepted. Fields the file
//! leaves out keep the value of the preset it is applied to.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::path::Path;
use veil_common::ObfuscatorOptions;

/// Parse an options document on top of the default preset.
pub fn parse_options(source: &str) -> Result<ObfuscatorOptions> {
    parse_options_over(source, ObfuscatorOptions::default())
}

/// Parse an options document on top of `base`.
pub fn parse_options_over(source: &str, base: ObfuscatorOptions) -> Result<ObfuscatorOptions> {
    let cleaned = remove_trailing_commas(&strip_comments(source));
    let overrides: Value = serde_json::from_str(&cleaned).context("failed to parse options JSON")?;
    let Value::Object(overrides) = overrides else {
        bail!("options must be a JSON object");
    };

    let Value::Object(mut merged) =
        serde_json::to_value(base).context("failed to serialize base options")?
    else {
        bail!("options did not serialize to a JSON object");
    };
    merge(&mut merged, overrides);

    serde_json::from_value(Value::Object(merged)).context("invalid options")
}

pub fn load_options(path: &Path) -> Result<ObfuscatorOptions> {
    load_options_over(path, ObfuscatorOptions::default())
}

pub fn load_options_over(path: &Path, base: ObfuscatorOptions) -> Result<ObfuscatorOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file: {}", path.display()))?;
    parse_options_over(&source, base)
        .with_context(|| format!("failed to load options file: {}", path.display()))
}

fn merge(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        tracing::debug!(option = %key, %value, "option overridden");
        base.insert(key, value);
    }
}

/// Drop `//` and `/* */` comments outside string literals. Newlines inside
/// comments are kept so parse errors point at the right line.
fn strip_comments(input: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str { escaped: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut state = State::Code;

    while let Some(ch) = chars.next() {
        state = match state {
            State::Code => match (ch, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    State::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    State::BlockComment
                }
                _ => {
                    out.push(ch);
                    if ch == '"' { State::Str { escaped: false } } else { State::Code }
                }
            },
            State::Str { escaped } => {
                out.push(ch);
                match ch {
                    _ if escaped => State::Str { escaped: false },
                    '\\' => State::Str { escaped: true },
                    '"' => State::Code,
                    _ => State::Str { escaped: false },
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    out.push(ch);
                    State::Code
                } else {
                    State::LineComment
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    State::Code
                } else {
                    if ch == '\n' {
                        out.push(ch);
                    }
                    State::BlockComment
                }
            }
        };
    }

    out
}

/// Drop commas that are followed (after whitespace) by `}` or `]`.
fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in input.char_indices() {
        if in_string {
            out.push(ch);
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        if ch == ',' {
            let next = input[index + 1..].chars().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        if ch == '"' {
            in_string = true;
        }
        out.push(ch);
    }

    out
}
