//! Object literal keys: `{ name: 1 }` becomes `{ '\x6e\x61\x6d\x65': 1 }`.
//!
//! Keys are only escaped, never redirected to the string table, because a
//! non-computed key must stay a plain literal. Shorthand properties are
//! expanded so the value keeps referring to the variable.

use crate::error::Result;
use crate::transform::{NodeTransform, TransformContext};
use veil_ast::{LiteralValue, NodeKind, ParentRef, SyntaxNode};

pub struct ObjectExpressionTransform<'a> {
    ctx: TransformContext<'a>,
}

impl<'a> ObjectExpressionTransform<'a> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        ObjectExpressionTransform { ctx }
    }
}

impl NodeTransform for ObjectExpressionTransform<'_> {
    fn name(&self) -> &'static str {
        "object-expression"
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::ObjectExpression
    }

    fn transform(&self, node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<()> {
        let SyntaxNode::ObjectExpression { properties } = node else {
            return Ok(());
        };

        for property in properties.iter_mut() {
            let SyntaxNode::Property {
                key,
                computed: false,
                shorthand,
                ..
            } = property
            else {
                continue;
            };

            let name = match &**key {
                SyntaxNode::Identifier { name } => name.clone(),
                SyntaxNode::Literal {
                    value: LiteralValue::String(value),
                    verbatim: None,
                    ..
                } => value.clone(),
                _ => continue,
            };

            **key = SyntaxNode::Literal {
                verbatim: Some(self.ctx.escape_string(&name)),
                value: LiteralValue::String(name),
                raw: None,
            };
            *shorthand = false;
        }
        Ok(())
    }
}
