//! Identifier renaming.
//!
//! Renaming works one scope at a time and in two full passes:
//!
//! 1. **collecting** - every binding identifier of the scope (parameters,
//!    declared variables, nested function names) gets an entry in a fresh
//!    [`NamesMap`], unless a reserved-name pattern matches it;
//! 2. **substituting** - the scope is walked again and every identifier found
//!    in the map is renamed, except where the identifier is a label rather
//!    than a reference: the key of a property (`{ a: 1 }`), the property
//!    of a non-computed member access (`obj.a`) and a statement label
//!    (`outer:`, `break outer`).
//!
//! Substitution starts only after collection has seen the whole scope, so
//! references that appear before their declaration (`f(); function f() {}`)
//! are renamed too. [`ScopeRenamer`] encodes the two passes as types: only a
//! collecting renamer can collect and only a substituting one can substitute.

use crate::error::{ObfuscationError, Result};
use crate::random::RandomSource;
use crate::transform::TransformContext;
use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::convert::Infallible;
use std::marker::PhantomData;
use veil_ast::{ParentRef, SyntaxNode, VisitMut, walk_mut};

// =============================================================================
// Reserved names
// =============================================================================

/// Compiled reserved-name patterns. A name is reserved when any pattern
/// matches anywhere in it.
#[derive(Debug, Clone, Default)]
pub struct ReservedNames {
    patterns: Vec<Regex>,
}

impl ReservedNames {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ObfuscationError::InvalidReservedName {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReservedNames { patterns })
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

// =============================================================================
// Names map
// =============================================================================

/// Original name to generated name, for one scope.
#[derive(Debug, Clone, Default)]
pub struct NamesMap {
    names: IndexMap<String, String>,
    generated: FxHashSet<String>,
}

impl NamesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map whose generated names never equal any of `taken`, e.g.
    /// the identifiers of the run's support artifacts.
    pub fn excluding<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NamesMap {
            names: IndexMap::new(),
            generated: taken.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.names.get(original).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.names.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replacement for `original`, generating one on first request.
    ///
    /// Generated names are unique within the map and never equal to a name
    /// the map renames or was built to exclude.
    pub fn ensure(&mut self, original: &str, random: &mut RandomSource) -> &str {
        if !self.names.contains_key(original) {
            let replacement = loop {
                let candidate = random.identifier_name();
                if !self.generated.contains(&candidate)
                    && !self.names.contains_key(&candidate)
                    && candidate != original
                {
                    break candidate;
                }
            };
            self.generated.insert(replacement.clone());
            self.names.insert(original.to_string(), replacement);
        }
        &self.names[original]
    }
}

// =============================================================================
// Per-node operations
// =============================================================================

/// Give a binding identifier a generated name in `names` unless it is reserved.
pub fn store_identifier_names(
    node: &SyntaxNode,
    names: &mut NamesMap,
    reserved: &ReservedNames,
    random: &mut RandomSource,
) {
    if let SyntaxNode::Identifier { name } = node {
        if !reserved.is_reserved(name) {
            names.ensure(name, random);
        }
    }
}

/// Rename `node` if it is an identifier in `names` used as a reference.
/// Returns whether the node was renamed.
pub fn replace_identifiers(node: &mut SyntaxNode, parent: Option<ParentRef>, names: &NamesMap) -> bool {
    let SyntaxNode::Identifier { name } = node else {
        return false;
    };
    let Some(replacement) = names.get(name) else {
        return false;
    };

    let labels_a_name = parent.is_some_and(|p| {
        p.is_property_key() || p.is_static_member_property() || p.is_label()
    });
    if labels_a_name {
        return false;
    }

    *name = replacement.to_string();
    true
}

// =============================================================================
// Binding discovery
// =============================================================================

/// Binding identifiers declared by a parameter or declarator pattern.
pub fn pattern_bindings(pattern: &SyntaxNode) -> Vec<&SyntaxNode> {
    let mut bindings = Vec::new();
    push_pattern_bindings(pattern, &mut bindings);
    bindings
}

fn push_pattern_bindings<'n>(pattern: &'n SyntaxNode, bindings: &mut Vec<&'n SyntaxNode>) {
    match pattern {
        SyntaxNode::Identifier { .. } => bindings.push(pattern),
        SyntaxNode::AssignmentPattern { left, .. } => push_pattern_bindings(left, bindings),
        SyntaxNode::RestElement { argument } => push_pattern_bindings(argument, bindings),
        _ => {}
    }
}

/// Names a function body declares for its own scope: declarator ids and
/// nested function declaration names. Nested functions are not entered.
/// Catch parameters belong to their catch clause and are skipped.
pub fn scope_bindings(body: &mut SyntaxNode) -> Vec<String> {
    let mut names = Vec::new();
    push_scope_bindings(body, &mut names);
    names
}

fn push_scope_bindings(node: &mut SyntaxNode, names: &mut Vec<String>) {
    match node {
        SyntaxNode::FunctionDeclaration { id, .. } => {
            if let Some(name) = id.as_deref().and_then(SyntaxNode::identifier_name) {
                names.push(name.to_string());
            }
            return;
        }
        SyntaxNode::FunctionExpression { .. } | SyntaxNode::ArrowFunctionExpression { .. } => return,
        SyntaxNode::VariableDeclarator { id, .. } => {
            names.extend(
                pattern_bindings(id)
                    .into_iter()
                    .filter_map(SyntaxNode::identifier_name)
                    .map(str::to_string),
            );
        }
        SyntaxNode::CatchClause { body, .. } => {
            push_scope_bindings(body, names);
            return;
        }
        _ => {}
    }

    for (_, child) in node.children_mut() {
        push_scope_bindings(child, names);
    }
}

// =============================================================================
// Scope renamer
// =============================================================================

/// Collection pass state.
#[derive(Debug)]
pub enum Collecting {}

/// Substitution pass state.
#[derive(Debug)]
pub enum Substituting {}

/// Two-pass renamer for one scope. The names map lives and dies with it.
pub struct ScopeRenamer<'a, State> {
    ctx: TransformContext<'a>,
    names: NamesMap,
    state: PhantomData<State>,
}

impl<'a> ScopeRenamer<'a, Collecting> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        ScopeRenamer {
            ctx,
            names: NamesMap::excluding(ctx.artifact_identifiers()),
            state: PhantomData,
        }
    }

    /// Record a binding identifier.
    pub fn collect(&mut self, binding: &SyntaxNode) {
        self.ctx.store_identifier_names(binding, &mut self.names);
    }

    /// Record every binding of a parameter or declarator pattern.
    pub fn collect_pattern(&mut self, pattern: &SyntaxNode) {
        for binding in pattern_bindings(pattern) {
            self.collect(binding);
        }
    }

    /// Record the bindings a function body declares.
    pub fn collect_scope(&mut self, body: &mut SyntaxNode) {
        for name in scope_bindings(body) {
            self.collect(&SyntaxNode::identifier(name));
        }
    }

    /// End the collection pass.
    pub fn into_substituting(self) -> ScopeRenamer<'a, Substituting> {
        ScopeRenamer {
            ctx: self.ctx,
            names: self.names,
            state: PhantomData,
        }
    }
}

impl ScopeRenamer<'_, Substituting> {
    pub fn names(&self) -> &NamesMap {
        &self.names
    }

    /// Rename references in `node` and its descendants. Returns how many
    /// identifiers were renamed.
    pub fn substitute(&self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> usize {
        if self.names.is_empty() {
            return 0;
        }

        let mut visitor = Substitution {
            ctx: self.ctx,
            names: &self.names,
            renamed: 0,
        };
        match walk_mut(node, parent, &mut visitor) {
            Ok(()) => visitor.renamed,
            Err(never) => match never {},
        }
    }
}

struct Substitution<'a, 'n> {
    ctx: TransformContext<'a>,
    names: &'n NamesMap,
    renamed: usize,
}

impl VisitMut for Substitution<'_, '_> {
    type Error = Infallible;

    fn enter(&mut self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> Result<(), Infallible> {
        if self.ctx.replace_identifiers(node, parent, self.names) {
            self.renamed += 1;
        }
        Ok(())
    }

    // `{ x }` whose value was renamed must print as `{ x: _0x1f }`.
    fn leave(&mut self, node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<(), Infallible> {
        if let SyntaxNode::Property {
            key,
            value,
            shorthand,
            ..
        } = node
        {
            if *shorthand && key.identifier_name() != value.identifier_name() {
                *shorthand = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/renaming_tests.rs"]
mod renaming_tests;
