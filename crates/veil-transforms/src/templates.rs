//! Protective code templates.
//!
//! Templates are opaque source text with `{name}` placeholders; the driver
//! fills them with generated identifiers and registers the result as a
//! snippet artifact. Keywords and property names that would give the
//! snippets away are spelled through the literal encoders.

use crate::encoding::{string_to_jsfuck, string_to_unicode};

/// Placeholder for the debug protection function's name.
pub const DEBUG_PROTECTION_FUNCTION_NAME: &str = "debugProtectionFunctionName";

/// Placeholder for the console output disabler's name.
pub const CONSOLE_OUTPUT_DISABLE_FUNCTION_NAME: &str = "consoleOutputDisableFunctionName";

/// Milliseconds between two runs of the interval guard.
pub const DEBUG_PROTECTION_INTERVAL_MS: u32 = 4000;

const CONSOLE_METHODS: [&str; 7] = ["log", "info", "error", "warn", "debug", "exception", "trace"];

/// Self-recursing guard that hits a `debugger` statement whenever a
/// debugger is attached, and loops harmlessly otherwise.
pub fn debug_protection_function_template() -> String {
    let debugger = string_to_jsfuck("debugger");
    format!(
        r#"var {{{DEBUG_PROTECTION_FUNCTION_NAME}}} = function () {{
    function debuggerProtection (counter) {{
        if (('' + counter / counter)['length'] !== 1 || counter % 20 === 0) {{
            (function () {{}}.constructor({debugger})());
        }} else {{
            [].filter.constructor({debugger})();
        }}

        debuggerProtection(++counter);
    }}

    try {{
        debuggerProtection(0);
    }} catch (y) {{}}
}};"#
    )
}

pub fn debug_protection_function_call_template() -> String {
    format!("{{{DEBUG_PROTECTION_FUNCTION_NAME}}}();")
}

pub fn debug_protection_function_interval_template() -> String {
    format!(
        "setInterval(function () {{\n    {{{DEBUG_PROTECTION_FUNCTION_NAME}}}();\n}}, {DEBUG_PROTECTION_INTERVAL_MS});"
    )
}

/// Replaces every `console` output method with a no-op, in browsers and
/// in Node alike.
pub fn console_output_disable_template() -> String {
    let methods = CONSOLE_METHODS
        .iter()
        .map(|method| string_to_unicode(method))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"var {{{CONSOLE_OUTPUT_DISABLE_FUNCTION_NAME}}} = function () {{
    var noop = function () {{}};
    var scope = typeof window !== 'undefined' ? window : typeof global !== 'undefined' ? global : this;
    var target = scope[{console}];
    if (!target) {{
        return;
    }}
    var methods = [{methods}];
    for (var index = 0; index < methods['length']; index++) {{
        target[methods[index]] = noop;
    }}
}};
{{{CONSOLE_OUTPUT_DISABLE_FUNCTION_NAME}}}();"#,
        console = string_to_unicode("console"),
    )
}

/// Substitute `{name}` placeholders. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |filled, (name, value)| {
            filled.replace(&format!("{{{name}}}"), value)
        })
}
