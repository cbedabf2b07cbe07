//! Literal encoding pipeline.
//!
//! Turns boolean, number and string literal values into replacement source
//! text:
//!
//! | value | replacement |
//! |-------|-------------|
//! | `true` / `false` | `!![]` / `![]` |
//! | `255` | `0xff` |
//! | `1.5` | `1.5` (only whole numbers are encoded) |
//! | `"hi"` | `'\x68\x69'`, or a string-table lookup such as `_0x1a2b('0x0')` |
//!
//! Strings may additionally be base64-encoded before escaping. The base64
//! step and the table redirect are gated by the same random sample, so a
//! literal either gets both or neither.

use crate::error::Result;
use crate::random::RandomSource;
use crate::registry::{ArtifactKey, ArtifactRegistry};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use veil_common::ObfuscatorOptions;

// =============================================================================
// Booleans
// =============================================================================

pub const JSFUCK_TRUE: &str = "!![]";
pub const JSFUCK_FALSE: &str = "![]";

pub fn encode_boolean(value: bool) -> &'static str {
    if value { JSFUCK_TRUE } else { JSFUCK_FALSE }
}

/// Expression evaluating to a single lowercase letter without spelling it.
pub fn jsfuck_letter(letter: char) -> Option<&'static str> {
    let expression = match letter {
        'a' => r#"(false+"")[1]"#,
        'b' => r#"([]["entries"]()+"")[2]"#,
        'c' => r#"([]["fill"]+"")[3]"#,
        'd' => r#"(undefined+"")[2]"#,
        'e' => r#"(true+"")[3]"#,
        'f' => r#"(false+"")[0]"#,
        'g' => r#"(false+[0]+String)[20]"#,
        'h' => r#"(+(101))["to"+String["name"]](21)[1]"#,
        'i' => r#"([false]+undefined)[10]"#,
        'j' => r#"([]["entries"]()+"")[3]"#,
        'k' => r#"(+(20))["to"+String["name"]](21)"#,
        'l' => r#"(false+"")[2]"#,
        'm' => r#"(Number+"")[11]"#,
        'n' => r#"(undefined+"")[1]"#,
        'o' => r#"(true+[]["fill"])[10]"#,
        'p' => r#"(+(211))["to"+String["name"]](31)[1]"#,
        'q' => r#"(+(212))["to"+String["name"]](31)[1]"#,
        'r' => r#"(true+"")[1]"#,
        's' => r#"(false+"")[3]"#,
        't' => r#"(true+"")[0]"#,
        'u' => r#"(undefined+"")[0]"#,
        'v' => r#"(+(31))["to"+String["name"]](32)"#,
        'w' => r#"(+(32))["to"+String["name"]](33)"#,
        'x' => r#"(+(101))["to"+String["name"]](34)[1]"#,
        'y' => r#"(NaN+[Infinity])[10]"#,
        'z' => r#"(+(35))["to"+String["name"]](36)"#,
        _ => return None,
    };
    Some(expression)
}

/// Concatenation expression spelling `value` letter by letter. Characters
/// without a letter expression are emitted as escaped string literals.
pub fn string_to_jsfuck(value: &str) -> String {
    value
        .chars()
        .map(|c| match jsfuck_letter(c) {
            Some(expression) => expression.to_string(),
            None => string_to_unicode(c.encode_utf8(&mut [0; 4])),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

// =============================================================================
// Numbers
// =============================================================================

/// 2^64, the first magnitude `u64` cannot hold. `u64::MAX as f64` rounds to
/// this same value, so the bound must be exclusive.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Hexadecimal literal for whole numbers, default decimal text otherwise.
///
/// Negative whole numbers become a negated hex literal (`-0x5`). Values
/// outside the `u64` range keep their decimal form, and non-finite values
/// are written the way JavaScript spells them.
pub fn encode_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }

    let magnitude = value.abs();
    if value.fract() != 0.0 || magnitude >= U64_LIMIT {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}0x{:x}", magnitude as u64)
}

// =============================================================================
// Strings
// =============================================================================

/// Quote `value` with every UTF-16 code unit written as an escape:
/// `\xHH` below 0x80, `\uHHHH` otherwise.
pub fn string_to_unicode(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() * 4 + 2);
    escaped.push('\'');
    for unit in value.encode_utf16() {
        if unit < 0x80 {
            escaped.push_str(&format!("\\x{unit:02x}"));
        } else {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }
    escaped.push('\'');
    escaped
}

/// Inverse of [`string_to_unicode`]. Returns `None` for text it did not produce.
pub fn unicode_to_string(escaped: &str) -> Option<String> {
    let body = escaped.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut units = Vec::with_capacity(body.len() / 4);
    let mut rest = body;

    while !rest.is_empty() {
        let tail = rest.strip_prefix('\\')?;
        let width = match tail.as_bytes().first()? {
            b'x' => 2,
            b'u' => 4,
            _ => return None,
        };
        let digits = tail.get(1..1 + width)?;
        units.push(u16::from_str_radix(digits, 16).ok()?);
        rest = &tail[1 + width..];
    }

    String::from_utf16(&units).ok()
}

/// Base64 of the UTF-8 bytes of `value`.
pub fn btoa(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

pub fn atob(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Replacement text for a string literal.
///
/// One sample is drawn per call. If it is within the threshold, the value is
/// base64-encoded first (when `encode_unicode_literals` is on) and the
/// escaped result is redirected into the string table (when `unicode_array`
/// is on).
pub fn encode_string(
    value: &str,
    options: &ObfuscatorOptions,
    registry: &mut ArtifactRegistry,
    random: &mut RandomSource,
) -> Result<String> {
    let qualifies = random.sample_unit() <= options.unicode_array_threshold;

    let encoded;
    let working = if options.encode_unicode_literals && qualifies {
        encoded = btoa(value);
        encoded.as_str()
    } else {
        value
    };

    let escaped = string_to_unicode(working);

    if options.unicode_array && qualifies {
        return redirect_to_table(&escaped, options.wrap_unicode_array_calls, registry);
    }

    Ok(escaped)
}

/// Intern an escaped string in the string table and return the expression
/// that reads it back: `wrapper('0x3')` when wrapping, `table[0x3]` otherwise.
pub fn redirect_to_table(
    escaped: &str,
    wrap_calls: bool,
    registry: &mut ArtifactRegistry,
) -> Result<String> {
    registry.string_table(ArtifactKey::UnicodeArray)?;
    let accessor = if wrap_calls {
        let wrapper = registry.calls_wrapper(ArtifactKey::UnicodeArrayCallsWrapper)?;
        Some(wrapper.identifier().to_string())
    } else {
        None
    };

    let table = registry.string_table_mut(ArtifactKey::UnicodeArray)?;
    let index = encode_number(table.intern(escaped) as f64);

    Ok(match accessor {
        Some(wrapper) => format!("{wrapper}('{index}')"),
        None => format!("{}[{}]", table.identifier(), index),
    })
}

#[cfg(test)]
#[path = "tests/encoding_tests.rs"]
mod encoding_tests;
