//! Catch parameter renaming.
//!
//! The parameter of `catch (e) { ... }` is visible only inside the clause,
//! so the clause is its own renaming unit. Variables declared inside the
//! clause body belong to the enclosing function and are renamed there.

use crate::error::Result;
use crate::renaming::ScopeRenamer;
use crate::transform::{NodeTransform, TransformContext};
use veil_ast::{NodeKind, ParentRef, Slot, SyntaxNode};

pub struct CatchClauseTransform<'a> {
    ctx: TransformContext<'a>,
}

impl<'a> CatchClauseTransform<'a> {
    pub fn new(ctx: TransformContext<'a>) -> Self {
        CatchClauseTransform { ctx }
    }
}

impl NodeTransform for CatchClauseTransform<'_> {
    fn name(&self) -> &'static str {
        "catch-clause"
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::CatchClause
    }

    fn transform(&self, node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<()> {
        let SyntaxNode::CatchClause {
            param: Some(param),
            body,
        } = node
        else {
            return Ok(());
        };

        let mut renamer = ScopeRenamer::new(self.ctx);
        renamer.collect_pattern(param);
        let renamer = renamer.into_substituting();

        let renamed = renamer
            .substitute(param, Some(ParentRef::new(NodeKind::CatchClause, Slot::Param)))
            + renamer.substitute(body, Some(ParentRef::new(NodeKind::CatchClause, Slot::Body)));

        tracing::debug!(renamed, "renamed catch parameter");
        Ok(())
    }
}
