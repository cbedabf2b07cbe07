//! Literal re-encoding.
//!
//! Booleans become JSFuck tokens, whole numbers become hex literals and
//! strings go through the string pipeline (escaping, optional base64 and
//! string-table redirect). The replacement is stored as the literal's
//! verbatim text; the value itself is kept for consumers that need it.
//!
//! Property keys are left to the object strategy, since a table lookup is
//! not a valid non-computed key. Directive strings (`'use strict'`) only
//! take effect as plain string statements and are kept. Literals that
//! already carry verbatim text were produced by another strategy and are
//! skipped.

use crate::error::Result;
use crate::transform::{NodeTransform, TransformContext};
use veil_ast::{LiteralValue, NodeKind, ParentRef, SyntaxNode};

pub struct LiteralTransform<'a> {
    ctx: TransformContext<'a>,
}

impl<'a> LiteralTransform<'a> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        LiteralTransform { ctx }
    }
}

impl NodeTransform for LiteralTransform<'_> {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Literal
    }

    fn transform(&self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> Result<()> {
        if parent.is_some_and(|p| p.is_property_key() || p.is_directive()) {
            return Ok(());
        }

        let SyntaxNode::Literal {
            value, verbatim, ..
        } = node
        else {
            return Ok(());
        };
        if verbatim.is_some() {
            return Ok(());
        }

        let replacement = match value {
            LiteralValue::Boolean(value) => self.ctx.encode_boolean(*value).to_string(),
            LiteralValue::Number(value) => self.ctx.encode_number(*value),
            LiteralValue::String(value) => self.ctx.encode_string(value)?,
            LiteralValue::Null => return Ok(()),
        };

        tracing::trace!(%replacement, "encoded literal");
        *verbatim = Some(replacement);
        Ok(())
    }
}
