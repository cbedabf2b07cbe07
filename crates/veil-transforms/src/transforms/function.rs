//! Function scope renaming.
//!
//! Each function is one renaming unit: its parameters, the variables it
//! declares and the functions declared directly inside it get generated
//! names throughout the function.
//!
//! ```javascript
//! function greet(name) { var message = 'hi ' + name; return message; }
//! ```
//!
//! Becomes (modulo literal encoding):
//!
//! ```javascript
//! function greet(_0x3e1f2a) { var _0x1b77c4 = 'hi ' + _0x3e1f2a; return _0x1b77c4; }
//! ```
//!
//! The function's own declared name belongs to the enclosing scope and is
//! left to it; top-level declarations are never renamed.

use crate::error::Result;
use crate::renaming::ScopeRenamer;
use crate::transform::{NodeTransform, TransformContext};
use veil_ast::{NodeKind, ParentRef, Slot, SyntaxNode};

pub struct FunctionTransform<'a> {
    ctx: TransformContext<'a>,
}

impl<'a> FunctionTransform<'a> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        FunctionTransform { ctx }
    }
}

impl NodeTransform for FunctionTransform<'_> {
    fn name(&self) -> &'static str {
        "function"
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind.is_function()
    }

    fn transform(&self, node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<()> {
        let kind = node.kind();
        let (id, params, body) = match node {
            // A function expression's name is only visible inside it.
            SyntaxNode::FunctionExpression {
                id, params, body, ..
            } => (id.as_deref_mut(), params, body),
            SyntaxNode::FunctionDeclaration { params, body, .. }
            | SyntaxNode::ArrowFunctionExpression { params, body, .. } => (None, params, body),
            _ => return Ok(()),
        };

        let mut renamer = ScopeRenamer::new(self.ctx);
        if let Some(id) = id.as_deref() {
            renamer.collect(id);
        }
        for param in params.iter() {
            renamer.collect_pattern(param);
        }
        renamer.collect_scope(body);

        let renamer = renamer.into_substituting();
        if renamer.names().is_empty() {
            return Ok(());
        }

        let mut renamed = 0;
        if let Some(id) = id {
            renamed += renamer.substitute(id, Some(ParentRef::new(kind, Slot::Id)));
        }
        for param in params.iter_mut() {
            renamed += renamer.substitute(param, Some(ParentRef::new(kind, Slot::Param)));
        }
        renamed += renamer.substitute(body, Some(ParentRef::new(kind, Slot::Body)));

        tracing::debug!(
            kind = %kind,
            bindings = renamer.names().len(),
            renamed,
            "renamed function scope"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use crate::registry::ArtifactRegistry;
    use crate::renaming::ReservedNames;
    use std::cell::RefCell;
    use veil_ast::DeclarationKind;
    use veil_common::ObfuscatorOptions;

    fn run(function: &mut SyntaxNode, reserved: &[&str]) {
        let options = ObfuscatorOptions::no_custom_nodes();
        let registry = RefCell::new(ArtifactRegistry::new());
        let random = RefCell::new(RandomSource::seeded(11));
        let reserved = ReservedNames::new(reserved).expect("valid patterns");
        let ctx = TransformContext::new(&options, &registry, &random, &reserved);

        FunctionTransform::new(ctx)
            .transform(function, None)
            .expect("renaming cannot fail");
    }

    fn param_name(function: &SyntaxNode, index: usize) -> String {
        match function {
            SyntaxNode::FunctionDeclaration { params, .. }
            | SyntaxNode::FunctionExpression { params, .. }
            | SyntaxNode::ArrowFunctionExpression { params, .. } => params[index]
                .identifier_name()
                .expect("identifier param")
                .to_string(),
            _ => panic!("not a function"),
        }
    }

    #[test]
    fn test_params_and_references_renamed_together() {
        let mut function = SyntaxNode::function_declaration(
            "add",
            vec![SyntaxNode::identifier("a"), SyntaxNode::identifier("b")],
            vec![SyntaxNode::return_statement(Some(SyntaxNode::binary(
                "+",
                SyntaxNode::identifier("a"),
                SyntaxNode::identifier("b"),
            )))],
        );

        run(&mut function, &[]);

        let a = param_name(&function, 0);
        let b = param_name(&function, 1);
        assert_ne!(a, "a");
        assert_ne!(a, b);

        let SyntaxNode::FunctionDeclaration { id, body, .. } = &function else {
            panic!("not a function declaration");
        };
        assert_eq!(id.as_deref().and_then(SyntaxNode::identifier_name), Some("add"));
        let expected = SyntaxNode::block(vec![SyntaxNode::return_statement(Some(
            SyntaxNode::binary("+", SyntaxNode::identifier(a), SyntaxNode::identifier(b)),
        ))]);
        assert_eq!(**body, expected);
    }

    #[test]
    fn test_generated_names_avoid_artifact_identifiers() {
        use crate::registry::{ArtifactKey, StringTable, SupportArtifact};

        // The run's source would hand the parameter the table's own name.
        let table_name = RandomSource::seeded(11).identifier_name();
        let mut registry = ArtifactRegistry::new();
        registry.insert(
            ArtifactKey::UnicodeArray,
            SupportArtifact::StringTable(StringTable::new(table_name.clone())),
        );

        let options = ObfuscatorOptions::no_custom_nodes();
        let registry = RefCell::new(registry);
        let random = RefCell::new(RandomSource::seeded(11));
        let reserved = ReservedNames::default();
        let ctx = TransformContext::new(&options, &registry, &random, &reserved);

        let mut function =
            SyntaxNode::function_expression(vec![SyntaxNode::identifier("value")], vec![]);
        FunctionTransform::new(ctx)
            .transform(&mut function, None)
            .expect("renaming cannot fail");

        let renamed = param_name(&function, 0);
        assert_ne!(renamed, "value");
        assert_ne!(renamed, table_name);
    }

    #[test]
    fn test_forward_reference_to_local_variable() {
        // function f() { g(x); var x = 1; }
        let mut function = SyntaxNode::function_declaration(
            "f",
            vec![],
            vec![
                SyntaxNode::expression_statement(SyntaxNode::call(
                    SyntaxNode::identifier("g"),
                    vec![SyntaxNode::identifier("x")],
                )),
                SyntaxNode::variable(DeclarationKind::Var, "x", Some(SyntaxNode::number_literal(1.0))),
            ],
        );

        run(&mut function, &[]);

        let SyntaxNode::FunctionDeclaration { body, .. } = &function else {
            panic!("not a function declaration");
        };
        let SyntaxNode::BlockStatement { body } = &**body else {
            panic!("not a block");
        };
        let SyntaxNode::ExpressionStatement { expression, .. } = &body[0] else {
            panic!("not an expression statement");
        };
        let SyntaxNode::CallExpression { callee, arguments } = &**expression else {
            panic!("not a call");
        };
        // `g` is free and keeps its name; `x` is local and is renamed.
        assert_eq!(callee.identifier_name(), Some("g"));
        let renamed_x = arguments[0].identifier_name().expect("identifier argument");
        assert_ne!(renamed_x, "x");

        let SyntaxNode::VariableDeclaration { declarations, .. } = &body[1] else {
            panic!("not a declaration");
        };
        let SyntaxNode::VariableDeclarator { id, .. } = &declarations[0] else {
            panic!("not a declarator");
        };
        assert_eq!(id.identifier_name(), Some(renamed_x));
    }

    #[test]
    fn test_reserved_params_keep_their_names() {
        let mut function = SyntaxNode::function_expression(
            vec![SyntaxNode::identifier("_temp"), SyntaxNode::identifier("temp")],
            vec![],
        );

        run(&mut function, &["^_"]);

        assert_eq!(param_name(&function, 0), "_temp");
        let renamed = param_name(&function, 1);
        assert!(renamed.starts_with("_0x"), "{renamed}");
    }

    #[test]
    fn test_default_and_rest_params() {
        let mut function = SyntaxNode::ArrowFunctionExpression {
            params: vec![
                SyntaxNode::AssignmentPattern {
                    left: Box::new(SyntaxNode::identifier("a")),
                    right: Box::new(SyntaxNode::number_literal(1.0)),
                },
                SyntaxNode::RestElement {
                    argument: Box::new(SyntaxNode::identifier("rest")),
                },
            ],
            body: Box::new(SyntaxNode::identifier("rest")),
            expression: true,
            is_async: false,
        };

        run(&mut function, &[]);

        let SyntaxNode::ArrowFunctionExpression { params, body, .. } = &function else {
            panic!("not an arrow");
        };
        let SyntaxNode::RestElement { argument } = &params[1] else {
            panic!("not a rest element");
        };
        let rest = argument.identifier_name().expect("identifier");
        assert_ne!(rest, "rest");
        assert_eq!(body.identifier_name(), Some(rest));
    }

    #[test]
    fn test_nested_function_body_not_collected() {
        // function outer() { function inner() { var hidden; } return hidden; }
        let inner = SyntaxNode::function_declaration(
            "inner",
            vec![],
            vec![SyntaxNode::variable(DeclarationKind::Var, "hidden", None)],
        );
        let mut function = SyntaxNode::function_declaration(
            "outer",
            vec![],
            vec![
                inner,
                SyntaxNode::return_statement(Some(SyntaxNode::identifier("hidden"))),
            ],
        );

        run(&mut function, &[]);

        let SyntaxNode::FunctionDeclaration { body, .. } = &function else {
            panic!("not a function declaration");
        };
        let SyntaxNode::BlockStatement { body } = &**body else {
            panic!("not a block");
        };
        // `inner` is declared in `outer`'s scope and is renamed there.
        let SyntaxNode::FunctionDeclaration { id, .. } = &body[0] else {
            panic!("not a function declaration");
        };
        assert_ne!(id.as_deref().and_then(SyntaxNode::identifier_name), Some("inner"));
        // `hidden` is not a binding of `outer`.
        assert_eq!(
            body[1],
            SyntaxNode::return_statement(Some(SyntaxNode::identifier("hidden")))
        );
    }
}
