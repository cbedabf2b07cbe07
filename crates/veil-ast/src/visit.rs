//! Depth-first mutable traversal with explicit parent context.
//!
//! Nodes do not store parent pointers. Instead the walker hands every
//! visited node a [`ParentRef`] describing the parent's kind and the field
//! (the [`Slot`]) the node occupies. That is enough to answer the questions
//! transforms ask, e.g. "is this identifier the key of a property?", without
//! holding a reference into the parent while the child is being mutated.

use crate::node::{NodeKind, SyntaxNode};

/// Field of the parent node that holds a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Body,
    Expression,
    Argument,
    Test,
    Consequent,
    Alternate,
    Init,
    Update,
    Declaration,
    Id,
    Param,
    Block,
    Handler,
    Finalizer,
    Key,
    Value,
    /// Label of a labeled statement, `break` or `continue`.
    Label,
    /// Expression of a directive prologue statement.
    Directive,
    Discriminant,
    Case,
    Element,
    Object,
    Property,
    Callee,
    Left,
    Right,
}

/// Non-owning description of a node's parent, valid for one visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub kind: NodeKind,
    pub slot: Slot,
    /// The parent's `computed` flag (properties and member accesses only).
    pub computed: bool,
}

impl ParentRef {
    pub fn new(kind: NodeKind, slot: Slot) -> Self {
        ParentRef {
            kind,
            slot,
            computed: false,
        }
    }

    pub fn computed(kind: NodeKind, slot: Slot, computed: bool) -> Self {
        ParentRef {
            kind,
            slot,
            computed,
        }
    }

    /// The child is the key of a non-computed object literal property.
    /// A computed key (`{ [a]: 1 }`) is an ordinary expression.
    pub fn is_property_key(&self) -> bool {
        self.kind == NodeKind::Property && self.slot == Slot::Key && !self.computed
    }

    /// The child is the property of a non-computed member access (`a.b`).
    pub fn is_static_member_property(&self) -> bool {
        self.kind == NodeKind::MemberExpression && self.slot == Slot::Property && !self.computed
    }

    /// The child names a statement label. Labels live in their own
    /// namespace and are never variable references.
    pub fn is_label(&self) -> bool {
        self.slot == Slot::Label
    }

    /// The child is the string of a directive such as `'use strict'`.
    pub fn is_directive(&self) -> bool {
        self.kind == NodeKind::ExpressionStatement && self.slot == Slot::Directive
    }
}

/// Visitor driven by [`walk_mut`].
pub trait VisitMut {
    type Error;

    /// Called before the node's children are visited. Mutations made here
    /// decide which children the walker descends into.
    fn enter(&mut self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> Result<(), Self::Error>;

    /// Called after all children have been visited.
    fn leave(&mut self, _node: &mut SyntaxNode, _parent: Option<ParentRef>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `node` and its descendants in pre-order. The first visitor error
/// stops the walk and is returned.
pub fn walk_mut<V>(
    node: &mut SyntaxNode,
    parent: Option<ParentRef>,
    visitor: &mut V,
) -> Result<(), V::Error>
where
    V: VisitMut + ?Sized,
{
    visitor.enter(node, parent)?;
    for (parent_ref, child) in node.children_mut() {
        walk_mut(child, Some(parent_ref), visitor)?;
    }
    visitor.leave(node, parent)
}

fn push_boxed<'a>(
    children: &mut Vec<(ParentRef, &'a mut SyntaxNode)>,
    parent: ParentRef,
    child: &'a mut Option<Box<SyntaxNode>>,
) {
    if let Some(child) = child {
        children.push((parent, &mut **child));
    }
}

impl SyntaxNode {
    /// Direct children in source order, each paired with its parent context.
    pub fn children_mut(&mut self) -> Vec<(ParentRef, &mut SyntaxNode)> {
        let kind = self.kind();
        let at = |slot| ParentRef::new(kind, slot);
        let mut children = Vec::new();

        match self {
            SyntaxNode::Program { body } | SyntaxNode::BlockStatement { body } => {
                children.extend(body.iter_mut().map(|c| (at(Slot::Body), c)));
            }
            SyntaxNode::ExpressionStatement {
                expression,
                directive,
            } => {
                let slot = if directive.is_some() {
                    Slot::Directive
                } else {
                    Slot::Expression
                };
                children.push((at(slot), &mut **expression));
            }
            SyntaxNode::ReturnStatement { argument } => {
                push_boxed(&mut children, at(Slot::Argument), argument);
            }
            SyntaxNode::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                children.push((at(Slot::Test), &mut **test));
                children.push((at(Slot::Consequent), &mut **consequent));
                push_boxed(&mut children, at(Slot::Alternate), alternate);
            }
            SyntaxNode::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                push_boxed(&mut children, at(Slot::Init), init);
                push_boxed(&mut children, at(Slot::Test), test);
                push_boxed(&mut children, at(Slot::Update), update);
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::WhileStatement { test, body } => {
                children.push((at(Slot::Test), &mut **test));
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                children.push((at(Slot::Block), &mut **block));
                push_boxed(&mut children, at(Slot::Handler), handler);
                push_boxed(&mut children, at(Slot::Finalizer), finalizer);
            }
            SyntaxNode::CatchClause { param, body } => {
                push_boxed(&mut children, at(Slot::Param), param);
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::ThrowStatement { argument } => {
                children.push((at(Slot::Argument), &mut **argument));
            }
            SyntaxNode::BreakStatement { label } | SyntaxNode::ContinueStatement { label } => {
                push_boxed(&mut children, at(Slot::Label), label);
            }
            SyntaxNode::LabeledStatement { label, body } => {
                children.push((at(Slot::Label), &mut **label));
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::SwitchStatement {
                discriminant,
                cases,
            } => {
                children.push((at(Slot::Discriminant), &mut **discriminant));
                children.extend(cases.iter_mut().map(|c| (at(Slot::Case), c)));
            }
            SyntaxNode::SwitchCase { test, consequent } => {
                push_boxed(&mut children, at(Slot::Test), test);
                children.extend(consequent.iter_mut().map(|c| (at(Slot::Consequent), c)));
            }
            SyntaxNode::DoWhileStatement { body, test } => {
                children.push((at(Slot::Body), &mut **body));
                children.push((at(Slot::Test), &mut **test));
            }
            SyntaxNode::ForInStatement { left, right, body } => {
                children.push((at(Slot::Left), &mut **left));
                children.push((at(Slot::Right), &mut **right));
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::EmptyStatement | SyntaxNode::DebuggerStatement => {}
            SyntaxNode::VariableDeclaration { declarations, .. } => {
                children.extend(declarations.iter_mut().map(|c| (at(Slot::Declaration), c)));
            }
            SyntaxNode::VariableDeclarator { id, init } => {
                children.push((at(Slot::Id), &mut **id));
                push_boxed(&mut children, at(Slot::Init), init);
            }
            SyntaxNode::FunctionDeclaration {
                id, params, body, ..
            }
            | SyntaxNode::FunctionExpression {
                id, params, body, ..
            } => {
                push_boxed(&mut children, at(Slot::Id), id);
                children.extend(params.iter_mut().map(|c| (at(Slot::Param), c)));
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::ArrowFunctionExpression { params, body, .. } => {
                children.extend(params.iter_mut().map(|c| (at(Slot::Param), c)));
                children.push((at(Slot::Body), &mut **body));
            }
            SyntaxNode::AssignmentPattern { left, right }
            | SyntaxNode::BinaryExpression { left, right, .. }
            | SyntaxNode::LogicalExpression { left, right, .. }
            | SyntaxNode::AssignmentExpression { left, right, .. } => {
                children.push((at(Slot::Left), &mut **left));
                children.push((at(Slot::Right), &mut **right));
            }
            SyntaxNode::RestElement { argument }
            | SyntaxNode::UnaryExpression { argument, .. }
            | SyntaxNode::UpdateExpression { argument, .. } => {
                children.push((at(Slot::Argument), &mut **argument));
            }
            SyntaxNode::Identifier { .. }
            | SyntaxNode::Literal { .. }
            | SyntaxNode::ThisExpression => {}
            SyntaxNode::ArrayExpression { elements } => {
                children.extend(
                    elements
                        .iter_mut()
                        .flatten()
                        .map(|c| (at(Slot::Element), c)),
                );
            }
            SyntaxNode::ObjectExpression { properties } => {
                children.extend(properties.iter_mut().map(|c| (at(Slot::Property), c)));
            }
            SyntaxNode::Property {
                key,
                value,
                computed,
                ..
            } => {
                let computed = *computed;
                children.push((ParentRef::computed(kind, Slot::Key, computed), &mut **key));
                children.push((ParentRef::computed(kind, Slot::Value, computed), &mut **value));
            }
            SyntaxNode::MemberExpression {
                computed,
                object,
                property,
            } => {
                let computed = *computed;
                children.push((ParentRef::computed(kind, Slot::Object, computed), &mut **object));
                children.push((
                    ParentRef::computed(kind, Slot::Property, computed),
                    &mut **property,
                ));
            }
            SyntaxNode::CallExpression { callee, arguments }
            | SyntaxNode::NewExpression { callee, arguments } => {
                children.push((at(Slot::Callee), &mut **callee));
                children.extend(arguments.iter_mut().map(|c| (at(Slot::Argument), c)));
            }
            SyntaxNode::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                children.push((at(Slot::Test), &mut **test));
                children.push((at(Slot::Consequent), &mut **consequent));
                children.push((at(Slot::Alternate), &mut **alternate));
            }
            SyntaxNode::SequenceExpression { expressions } => {
                children.extend(expressions.iter_mut().map(|c| (at(Slot::Expression), c)));
            }
        }

        children
    }
}
