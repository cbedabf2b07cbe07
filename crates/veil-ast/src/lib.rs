//! Syntax tree for the veil obfuscator.
//!
//! The tree is a plain owned hierarchy: every node owns its children and no
//! node points back at its parent. Code that needs to know where a node sits
//! (the key of a property, the property of a member access, ...) receives a
//! [`ParentRef`] from the walker for the duration of one visit.
//!
//! Nodes (de)serialize as ESTree JSON, so any parser that can produce
//! ESTree output can feed the engine and any ESTree printer can consume it.

pub mod node;
pub use node::{DeclarationKind, LiteralValue, NodeKind, PropertyKind, SyntaxNode};

pub mod visit;
pub use visit::{ParentRef, Slot, VisitMut, walk_mut};

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod node_tests;
#[cfg(test)]
#[path = "tests/visit_tests.rs"]
mod visit_tests;
