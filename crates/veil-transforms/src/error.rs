//! Errors raised while obfuscating a tree.

use crate::registry::ArtifactKey;

/// Fatal errors of an obfuscation run. None of them is caused by the input
/// program: they signal wiring or configuration mistakes and abort the run.
#[derive(Debug, thiserror::Error)]
pub enum ObfuscationError {
    /// A transform needed an artifact the driver did not seed.
    #[error("`{key}` artifact is not registered; it must be seeded before transforms run")]
    MissingSupportArtifact { key: ArtifactKey },

    /// The artifact registered under `key` has a different shape.
    #[error("artifact registered as `{key}` is not a {expected}")]
    ArtifactKindMismatch {
        key: ArtifactKey,
        expected: &'static str,
    },

    /// A reserved-name pattern is not a valid regular expression.
    #[error("invalid reserved name pattern `{pattern}`")]
    InvalidReservedName {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T, E = ObfuscationError> = std::result::Result<T, E>;
