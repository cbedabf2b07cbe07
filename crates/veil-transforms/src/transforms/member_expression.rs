//! Member access rewriting: `obj.name` becomes `obj[<encoded 'name'>]`.
//!
//! The new property is a string literal whose verbatim text is the string
//! pipeline's output, so the property name can end up in the string table
//! like any other literal. Computed accesses are left to the literal
//! strategy.

use crate::error::Result;
use crate::transform::{NodeTransform, TransformContext};
use veil_ast::{LiteralValue, NodeKind, ParentRef, SyntaxNode};

pub struct MemberExpressionTransform<'a> {
    ctx: TransformContext<'a>,
}

impl<'a> MemberExpressionTransform<'a> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        MemberExpressionTransform { ctx }
    }
}

impl NodeTransform for MemberExpressionTransform<'_> {
    fn name(&self) -> &'static str {
        "member-expression"
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::MemberExpression
    }

    fn transform(&self, node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<()> {
        let SyntaxNode::MemberExpression {
            computed, property, ..
        } = node
        else {
            return Ok(());
        };
        if *computed {
            return Ok(());
        }
        let Some(name) = property.identifier_name().map(str::to_string) else {
            return Ok(());
        };

        let verbatim = self.ctx.encode_string(&name)?;
        **property = SyntaxNode::Literal {
            value: LiteralValue::String(name),
            raw: None,
            verbatim: Some(verbatim),
        };
        *computed = true;
        Ok(())
    }
}
