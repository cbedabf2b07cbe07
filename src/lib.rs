//! veil - JavaScript syntax-tree obfuscator.
//!
//! The engine works on ESTree JSON trees produced by any JavaScript parser:
//! identifiers bound inside functions are renamed, literals are re-encoded,
//! and support code (a shared string table, its accessor, protective
//! snippets) is generated for the printer to emit ahead of the program.
//!
//! ```no_run
//! use veil::{Obfuscator, ObfuscatorOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut program = serde_json::from_str(r#"{"type": "Program", "body": []}"#)?;
//! let output = Obfuscator::new(ObfuscatorOptions::default().normalize())?
//!     .with_seed(7)
//!     .obfuscate(&mut program)?;
//! println!("{}", output.preamble());
//! # Ok(())
//! # }
//! ```
//!
//! The workspace is split by concern:
//! - `veil-common`: options and their presets
//! - `veil-ast`: the owned syntax tree and its walker
//! - `veil-transforms`: encoding, renaming, registry, strategies, run driver

pub use veil_ast as ast;
pub use veil_common as common;
pub use veil_transforms as transforms;

pub use veil_ast::SyntaxNode;
pub use veil_common::ObfuscatorOptions;
pub use veil_transforms::{ArtifactKey, ObfuscationError, ObfuscationOutput, Obfuscator};

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;

// Command-line front end: arguments, config files, run driver
pub mod cli;
