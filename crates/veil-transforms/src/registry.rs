//! Support-artifact registry.
//!
//! Transforms cooperate on program-wide generated code through this
//! registry: the string table that every redirected literal indexes into,
//! the accessor that wraps table reads, and the protective snippets. The run
//! driver seeds the artifacts before the walk; transforms only look them up
//! and fail with [`ObfuscationError::MissingSupportArtifact`] when something
//! they need is absent. The external printer emits [`SupportArtifact::render`]
//! output for every entry, in registration order, ahead of the program.

use crate::encoding::encode_number;
use crate::error::{ObfuscationError, Result};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Key under which an artifact is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKey {
    UnicodeArray,
    UnicodeArrayCallsWrapper,
    ConsoleOutputDisable,
    DebugProtectionFunction,
    DebugProtectionFunctionCall,
    DebugProtectionFunctionInterval,
}

impl ArtifactKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKey::UnicodeArray => "unicodeArray",
            ArtifactKey::UnicodeArrayCallsWrapper => "unicodeArrayCallsWrapper",
            ArtifactKey::ConsoleOutputDisable => "consoleOutputDisable",
            ArtifactKey::DebugProtectionFunction => "debugProtectionFunction",
            ArtifactKey::DebugProtectionFunctionCall => "debugProtectionFunctionCall",
            ArtifactKey::DebugProtectionFunctionInterval => "debugProtectionFunctionInterval",
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Artifacts
// =============================================================================

/// Ordered, deduplicated table of escaped string literals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StringTable {
    identifier: String,
    entries: Vec<String>,
    /// Rotation applied to the emitted array and undone at runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation: Option<u64>,
    #[serde(skip)]
    positions: FxHashMap<String, usize>,
}

impl StringTable {
    pub fn new(identifier: impl Into<String>) -> Self {
        StringTable {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: u64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rotation(&self) -> Option<u64> {
        self.rotation
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.positions.get(value).copied()
    }

    /// Position of `value`, appending it first if it is not present yet.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(position) = self.position(value) {
            return position;
        }

        let position = self.entries.len();
        self.entries.push(value.to_string());
        self.positions.insert(value.to_string(), position);
        position
    }

    /// Entries in the order they appear in the emitted array literal.
    pub fn emitted_entries(&self) -> Vec<String> {
        let mut emitted = self.entries.clone();
        if let Some(rotation) = self.effective_rotation() {
            emitted.rotate_right(rotation);
        }
        emitted
    }

    fn effective_rotation(&self) -> Option<usize> {
        let rotation = self.rotation?;
        if self.entries.is_empty() {
            return None;
        }
        let rotation = (rotation % self.entries.len() as u64) as usize;
        (rotation != 0).then_some(rotation)
    }

    pub fn render(&self) -> String {
        let mut code = format!(
            "var {} = [{}];",
            self.identifier,
            self.emitted_entries().join(", ")
        );

        // Each `push(shift())` rotates left by one, undoing one step of the
        // right rotation applied above.
        if let Some(rotation) = self.effective_rotation() {
            code.push_str(&format!(
                "\n(function (array, times) {{ while (times--) {{ array['push'](array['shift']()); }} }})({}, {});",
                self.identifier,
                encode_number(rotation as f64)
            ));
        }

        code
    }
}

/// Generated function that reads the string table by hexadecimal index.
#[derive(Debug, Clone, Serialize)]
pub struct CallsWrapper {
    identifier: String,
    table_identifier: String,
    /// Entries are base64 text that must be decoded after lookup.
    decode_entries: bool,
}

impl CallsWrapper {
    pub fn new(
        identifier: impl Into<String>,
        table_identifier: impl Into<String>,
        decode_entries: bool,
    ) -> Self {
        CallsWrapper {
            identifier: identifier.into(),
            table_identifier: table_identifier.into(),
            decode_entries,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn render(&self) -> String {
        let result = if self.decode_entries {
            "decodeURIComponent(escape(atob(value)))"
        } else {
            "value"
        };

        format!(
            "var {} = function (index) {{\n    var value = {}[parseInt(index, 0x10)];\n    return {};\n}};",
            self.identifier, self.table_identifier, result
        )
    }
}

/// Opaque generated code such as the debug-protection guard.
#[derive(Debug, Clone, Serialize)]
pub struct Snippet {
    identifier: String,
    code: String,
}

impl Snippet {
    pub fn new(identifier: impl Into<String>, code: impl Into<String>) -> Self {
        Snippet {
            identifier: identifier.into(),
            code: code.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// A generated code fragment shared by all transforms of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SupportArtifact {
    StringTable(StringTable),
    CallsWrapper(CallsWrapper),
    Snippet(Snippet),
}

impl SupportArtifact {
    /// Name generated code uses to reference this artifact.
    pub fn identifier(&self) -> &str {
        match self {
            SupportArtifact::StringTable(table) => table.identifier(),
            SupportArtifact::CallsWrapper(wrapper) => wrapper.identifier(),
            SupportArtifact::Snippet(snippet) => snippet.identifier(),
        }
    }

    /// Declaration code the printer emits for this artifact.
    pub fn render(&self) -> String {
        match self {
            SupportArtifact::StringTable(table) => table.render(),
            SupportArtifact::CallsWrapper(wrapper) => wrapper.render(),
            SupportArtifact::Snippet(snippet) => snippet.code().to_string(),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Keyed store of the support artifacts of one run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    artifacts: IndexMap<ArtifactKey, SupportArtifact>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `artifact` under `key`, returning the artifact it replaced.
    pub fn insert(&mut self, key: ArtifactKey, artifact: SupportArtifact) -> Option<SupportArtifact> {
        self.artifacts.insert(key, artifact)
    }

    pub fn get(&self, key: ArtifactKey) -> Option<&SupportArtifact> {
        self.artifacts.get(&key)
    }

    pub fn contains(&self, key: ArtifactKey) -> bool {
        self.artifacts.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKey, &SupportArtifact)> {
        self.artifacts.iter().map(|(key, artifact)| (*key, artifact))
    }

    pub fn string_table(&self, key: ArtifactKey) -> Result<&StringTable> {
        match self.require(key)? {
            SupportArtifact::StringTable(table) => Ok(table),
            _ => Err(mismatch(key, "string table")),
        }
    }

    pub fn string_table_mut(&mut self, key: ArtifactKey) -> Result<&mut StringTable> {
        match self.artifacts.get_mut(&key) {
            Some(SupportArtifact::StringTable(table)) => Ok(table),
            Some(_) => Err(mismatch(key, "string table")),
            None => Err(ObfuscationError::MissingSupportArtifact { key }),
        }
    }

    pub fn calls_wrapper(&self, key: ArtifactKey) -> Result<&CallsWrapper> {
        match self.require(key)? {
            SupportArtifact::CallsWrapper(wrapper) => Ok(wrapper),
            _ => Err(mismatch(key, "calls wrapper")),
        }
    }

    /// Rendered declarations in registration order.
    pub fn render_all(&self) -> Vec<String> {
        self.artifacts.values().map(SupportArtifact::render).collect()
    }

    fn require(&self, key: ArtifactKey) -> Result<&SupportArtifact> {
        self.artifacts
            .get(&key)
            .ok_or(ObfuscationError::MissingSupportArtifact { key })
    }
}

fn mismatch(key: ArtifactKey, expected: &'static str) -> ObfuscationError {
    ObfuscationError::ArtifactKindMismatch { key, expected }
}
