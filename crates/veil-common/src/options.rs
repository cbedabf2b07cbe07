//! Obfuscation options.
//!
//! `ObfuscatorOptions` is read once per run and shared by reference with
//! every transform. JSON field names follow the `camelCase` spelling used by
//! configuration files:
//!
//! ```json
//! {
//!     "reservedNames": ["^_", "jQuery"],
//!     "unicodeArray": true,
//!     "unicodeArrayThreshold": 0.75,
//!     "wrapUnicodeArrayCalls": true
//! }
//! ```
//!
//! Fields missing from a configuration file take their value from the
//! default preset.

use serde::{Deserialize, Serialize};

/// Threshold used by the default preset.
pub const DEFAULT_UNICODE_ARRAY_THRESHOLD: f64 = 0.8;

/// Options controlling a single obfuscation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObfuscatorOptions {
    /// Patterns (regular expressions) for identifiers that must keep their
    /// names. A pattern reserves every name it matches anywhere, so `^_`
    /// reserves `_temp` and `jQuery` reserves `jQueryUI`.
    pub reserved_names: Vec<String>,

    /// Base64-encode string literals that are routed through the string table.
    pub encode_unicode_literals: bool,

    /// Collect string literals into one shared table of escaped strings.
    pub unicode_array: bool,

    /// Probability in `[0, 1]` that a given string literal is routed through
    /// the shared table (and encoded, when encoding is enabled).
    pub unicode_array_threshold: f64,

    /// Read table entries through a generated accessor function instead of
    /// indexing the table directly.
    pub wrap_unicode_array_calls: bool,

    /// Emit the table rotated by a random amount together with the code
    /// that rotates it back at runtime.
    pub rotate_unicode_array: bool,

    /// Inject the anti-debugging guard.
    pub debug_protection: bool,

    /// Re-run the anti-debugging guard periodically.
    pub debug_protection_interval: bool,

    /// Replace `console` output methods with no-ops.
    pub disable_console_output: bool,
}

impl Default for ObfuscatorOptions {
    fn default() -> Self {
        ObfuscatorOptions {
            reserved_names: Vec::new(),
            encode_unicode_literals: false,
            unicode_array: true,
            unicode_array_threshold: DEFAULT_UNICODE_ARRAY_THRESHOLD,
            wrap_unicode_array_calls: true,
            rotate_unicode_array: true,
            debug_protection: false,
            debug_protection_interval: false,
            disable_console_output: true,
        }
    }
}

impl ObfuscatorOptions {
    /// Preset that injects no support artifacts at all: identifiers are
    /// renamed and literals re-encoded in place, nothing else.
    pub fn no_custom_nodes() -> Self {
        ObfuscatorOptions {
            reserved_names: Vec::new(),
            encode_unicode_literals: false,
            unicode_array: false,
            unicode_array_threshold: 0.0,
            wrap_unicode_array_calls: false,
            rotate_unicode_array: false,
            debug_protection: false,
            debug_protection_interval: false,
            disable_console_output: false,
        }
    }

    /// Parse options from a JSON document. Missing fields use the default preset.
    pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Apply the dependency rules between options.
    ///
    /// Rules run in a fixed order, so later rules see the result of earlier ones:
    /// 1. the threshold is clamped to `[0, 1]` (NaN becomes 0);
    /// 2. a zero threshold disables the string table;
    /// 3. without the string table, encoding, rotation and wrapping are off;
    /// 4. encoded literals are decoded by the accessor wrapper, so encoding
    ///    turns wrapping on;
    /// 5. the debug-protection interval needs debug protection.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.unicode_array_threshold = if self.unicode_array_threshold.is_nan() {
            0.0
        } else {
            self.unicode_array_threshold.clamp(0.0, 1.0)
        };

        if self.unicode_array_threshold == 0.0 {
            self.unicode_array = false;
        }

        if !self.unicode_array {
            self.encode_unicode_literals = false;
            self.rotate_unicode_array = false;
            self.wrap_unicode_array_calls = false;
            self.unicode_array_threshold = 0.0;
        }

        if self.encode_unicode_literals {
            self.wrap_unicode_array_calls = true;
        }

        if !self.debug_protection {
            self.debug_protection_interval = false;
        }

        self
    }
}
