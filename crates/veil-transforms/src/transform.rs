//! Transform contract shared by all node strategies.
//!
//! A strategy implements [`NodeTransform`] for the node kinds it handles and
//! is built from a [`TransformContext`]: the options of the run, the shared
//! artifact registry, the run's random source and the compiled reserved
//! names. The context is `Copy`, so strategies hold it by value and stay
//! stateless between calls; everything a call changes lives in the tree,
//! the registry or the random source.
//!
//! The walker calls `transform(node, parent)` once per visited node, with the
//! parent's kind and the slot the node occupies. Nothing else about the
//! parent is available, and nothing else is needed.

use crate::encoding;
use crate::error::Result;
use crate::random::RandomSource;
use crate::registry::ArtifactRegistry;
use crate::renaming::{self, NamesMap, ReservedNames};
use std::cell::RefCell;
use veil_ast::{NodeKind, ParentRef, SyntaxNode};
use veil_common::ObfuscatorOptions;

/// A node-kind specific obfuscation strategy.
pub trait NodeTransform {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether the strategy wants to see nodes of `kind`.
    fn applies_to(&self, kind: NodeKind) -> bool;

    /// Rewrite `node` in place.
    fn transform(&self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> Result<()>;
}

/// Shared services every strategy is constructed with.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    options: &'a ObfuscatorOptions,
    registry: &'a RefCell<ArtifactRegistry>,
    random: &'a RefCell<RandomSource>,
    reserved: &'a ReservedNames,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        options: &'a ObfuscatorOptions,
        registry: &'a RefCell<ArtifactRegistry>,
        random: &'a RefCell<RandomSource>,
        reserved: &'a ReservedNames,
    ) -> Self {
        TransformContext {
            options,
            registry,
            random,
            reserved,
        }
    }

    /// Identifiers of the seeded support artifacts. Generated local names
    /// must avoid them or a renamed binding would shadow the string table.
    pub fn artifact_identifiers(&self) -> Vec<String> {
        self.registry
            .borrow()
            .iter()
            .map(|(_, artifact)| artifact.identifier().to_string())
            .collect()
    }

    pub fn is_reserved_name(&self, name: &str) -> bool {
        self.reserved.is_reserved(name)
    }

    pub fn store_identifier_names(&self, node: &SyntaxNode, names: &mut NamesMap) {
        renaming::store_identifier_names(node, names, self.reserved, &mut self.random.borrow_mut());
    }

    pub fn replace_identifiers(
        &self,
        node: &mut SyntaxNode,
        parent: Option<ParentRef>,
        names: &NamesMap,
    ) -> bool {
        renaming::replace_identifiers(node, parent, names)
    }

    pub fn encode_boolean(&self, value: bool) -> &'static str {
        encoding::encode_boolean(value)
    }

    pub fn encode_number(&self, value: f64) -> String {
        encoding::encode_number(value)
    }

    pub fn escape_string(&self, value: &str) -> String {
        encoding::string_to_unicode(value)
    }

    pub fn encode_string(&self, value: &str) -> Result<String> {
        encoding::encode_string(
            value,
            self.options,
            &mut self.registry.borrow_mut(),
            &mut self.random.borrow_mut(),
        )
    }
}
