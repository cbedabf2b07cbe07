//! Transformation engine of the veil obfuscator.
//!
//! The engine rewrites an ESTree syntax tree in place:
//! - identifiers bound inside functions and catch clauses get generated names
//!   ([`renaming`], [`transforms::FunctionTransform`],
//!   [`transforms::CatchClauseTransform`])
//! - literals and static property names are re-encoded ([`encoding`],
//!   [`transforms::LiteralTransform`], [`transforms::MemberExpressionTransform`],
//!   [`transforms::ObjectExpressionTransform`])
//! - program-wide support code (string table, table accessor, protective
//!   snippets) is collected in an [`ArtifactRegistry`] for the printer
//!
//! [`Obfuscator`] drives one run end to end.

pub mod error;
pub use error::{ObfuscationError, Result};

pub mod random;
pub use random::RandomSource;

pub mod registry;
pub use registry::{ArtifactKey, ArtifactRegistry, CallsWrapper, Snippet, StringTable, SupportArtifact};

// Literal encoders
pub mod encoding;

// Identifier renaming protocol
pub mod renaming;
pub use renaming::{NamesMap, ReservedNames, ScopeRenamer};

pub mod transform;
pub use transform::{NodeTransform, TransformContext};

pub mod transforms;

pub mod templates;

pub mod obfuscator;
pub use obfuscator::{ObfuscationOutput, Obfuscator, RenderedArtifact, RunStats};
