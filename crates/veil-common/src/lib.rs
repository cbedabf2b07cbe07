//! Common types for the veil obfuscator.
//!
//! This crate provides the types every other veil crate agrees on:
//! - Obfuscation options (`ObfuscatorOptions`) and their presets
//! - Option normalization rules applied before a run

// Options - immutable for the duration of one obfuscation run
pub mod options;
pub use options::ObfuscatorOptions;
