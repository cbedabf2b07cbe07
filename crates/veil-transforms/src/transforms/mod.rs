//! Node-kind strategies.
//!
//! | strategy | nodes | effect |
//! |----------|-------|--------|
//! | `FunctionTransform` | function declarations, expressions, arrows | renames the function's bindings |
//! | `CatchClauseTransform` | catch clauses | renames the catch parameter |
//! | `MemberExpressionTransform` | `a.b` | rewrites to `a[<encoded 'b'>]` |
//! | `ObjectExpressionTransform` | object literals | rewrites identifier keys to escaped strings |
//! | `LiteralTransform` | literals | re-encodes booleans, numbers and strings |
//!
//! Renaming strategies must run before the others on a given node so that
//! the rewritten nodes they leave behind are never mistaken for references.

pub mod catch_clause;
pub mod function;
pub mod literal;
pub mod member_expression;
pub mod object_expression;

pub use catch_clause::CatchClauseTransform;
pub use function::FunctionTransform;
pub use literal::LiteralTransform;
pub use member_expression::MemberExpressionTransform;
pub use object_expression::ObjectExpressionTransform;

use crate::transform::{NodeTransform, TransformContext};

/// All strategies in dispatch order.
pub fn default_transforms<'a>(ctx: TransformContext<'a>) -> Vec<Box<dyn NodeTransform + 'a>> {
    vec![
        Box::new(FunctionTransform::new(ctx)),
        Box::new(CatchClauseTransform::new(ctx)),
        Box::new(MemberExpressionTransform::new(ctx)),
        Box::new(ObjectExpressionTransform::new(ctx)),
        Box::new(LiteralTransform::new(ctx)),
    ]
}
