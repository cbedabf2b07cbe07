//! Syntax node definitions.
//!
//! `SyntaxNode` covers the ESTree node kinds the obfuscator rewrites or has
//! to look through. The JSON representation is internally tagged on
//! `"type"`, matching ESTree:
//!
//! ```json
//! { "type": "MemberExpression", "computed": false,
//!   "object": { "type": "Identifier", "name": "console" },
//!   "property": { "type": "Identifier", "name": "log" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried by a `Literal` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

/// Object literal property kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Init,
    Get,
    Set,
}

fn default_true() -> bool {
    true
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyntaxNode {
    // =========================================================================
    // Program and statements
    // =========================================================================
    Program {
        body: Vec<SyntaxNode>,
    },
    ExpressionStatement {
        expression: Box<SyntaxNode>,
        /// Raw directive text (`use strict`) when the statement belongs to a
        /// directive prologue.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        directive: Option<String>,
    },
    BlockStatement {
        body: Vec<SyntaxNode>,
    },
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<SyntaxNode>>,
    },
    IfStatement {
        test: Box<SyntaxNode>,
        consequent: Box<SyntaxNode>,
        #[serde(default)]
        alternate: Option<Box<SyntaxNode>>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<SyntaxNode>>,
        #[serde(default)]
        test: Option<Box<SyntaxNode>>,
        #[serde(default)]
        update: Option<Box<SyntaxNode>>,
        body: Box<SyntaxNode>,
    },
    WhileStatement {
        test: Box<SyntaxNode>,
        body: Box<SyntaxNode>,
    },
    TryStatement {
        block: Box<SyntaxNode>,
        #[serde(default)]
        handler: Option<Box<SyntaxNode>>,
        #[serde(default)]
        finalizer: Option<Box<SyntaxNode>>,
    },
    CatchClause {
        #[serde(default)]
        param: Option<Box<SyntaxNode>>,
        body: Box<SyntaxNode>,
    },
    ThrowStatement {
        argument: Box<SyntaxNode>,
    },
    BreakStatement {
        #[serde(default)]
        label: Option<Box<SyntaxNode>>,
    },
    ContinueStatement {
        #[serde(default)]
        label: Option<Box<SyntaxNode>>,
    },
    LabeledStatement {
        label: Box<SyntaxNode>,
        body: Box<SyntaxNode>,
    },
    SwitchStatement {
        discriminant: Box<SyntaxNode>,
        cases: Vec<SyntaxNode>,
    },
    /// `case test:` or, with no test, `default:`.
    SwitchCase {
        #[serde(default)]
        test: Option<Box<SyntaxNode>>,
        consequent: Vec<SyntaxNode>,
    },
    DoWhileStatement {
        body: Box<SyntaxNode>,
        test: Box<SyntaxNode>,
    },
    ForInStatement {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
        body: Box<SyntaxNode>,
    },
    EmptyStatement,
    DebuggerStatement,

    // =========================================================================
    // Declarations and functions
    // =========================================================================
    VariableDeclaration {
        declarations: Vec<SyntaxNode>,
        kind: DeclarationKind,
    },
    VariableDeclarator {
        id: Box<SyntaxNode>,
        #[serde(default)]
        init: Option<Box<SyntaxNode>>,
    },
    FunctionDeclaration {
        #[serde(default)]
        id: Option<Box<SyntaxNode>>,
        params: Vec<SyntaxNode>,
        body: Box<SyntaxNode>,
        #[serde(default)]
        generator: bool,
        #[serde(default, rename = "async")]
        is_async: bool,
    },
    FunctionExpression {
        #[serde(default)]
        id: Option<Box<SyntaxNode>>,
        params: Vec<SyntaxNode>,
        body: Box<SyntaxNode>,
        #[serde(default)]
        generator: bool,
        #[serde(default, rename = "async")]
        is_async: bool,
    },
    ArrowFunctionExpression {
        params: Vec<SyntaxNode>,
        body: Box<SyntaxNode>,
        /// True when `body` is an expression rather than a block.
        #[serde(default)]
        expression: bool,
        #[serde(default, rename = "async")]
        is_async: bool,
    },
    AssignmentPattern {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    RestElement {
        argument: Box<SyntaxNode>,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
        /// Replacement source text. When set, printers emit it verbatim
        /// instead of the literal value.
        #[serde(
            default,
            rename = "x-verbatim",
            skip_serializing_if = "Option::is_none"
        )]
        verbatim: Option<String>,
    },
    ThisExpression,
    ArrayExpression {
        elements: Vec<Option<SyntaxNode>>,
    },
    ObjectExpression {
        properties: Vec<SyntaxNode>,
    },
    Property {
        key: Box<SyntaxNode>,
        value: Box<SyntaxNode>,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        shorthand: bool,
        #[serde(default)]
        method: bool,
        #[serde(default)]
        kind: PropertyKind,
    },
    MemberExpression {
        #[serde(default)]
        computed: bool,
        object: Box<SyntaxNode>,
        property: Box<SyntaxNode>,
    },
    CallExpression {
        callee: Box<SyntaxNode>,
        arguments: Vec<SyntaxNode>,
    },
    NewExpression {
        callee: Box<SyntaxNode>,
        arguments: Vec<SyntaxNode>,
    },
    UnaryExpression {
        operator: String,
        #[serde(default = "default_true")]
        prefix: bool,
        argument: Box<SyntaxNode>,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: Box<SyntaxNode>,
    },
    BinaryExpression {
        operator: String,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    LogicalExpression {
        operator: String,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    ConditionalExpression {
        test: Box<SyntaxNode>,
        consequent: Box<SyntaxNode>,
        alternate: Box<SyntaxNode>,
    },
    SequenceExpression {
        expressions: Vec<SyntaxNode>,
    },
}

/// Discriminant of [`SyntaxNode`], used for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    ExpressionStatement,
    BlockStatement,
    ReturnStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    TryStatement,
    CatchClause,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    LabeledStatement,
    SwitchStatement,
    SwitchCase,
    DoWhileStatement,
    ForInStatement,
    EmptyStatement,
    DebuggerStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    AssignmentPattern,
    RestElement,
    Identifier,
    Literal,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    MemberExpression,
    CallExpression,
    NewExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    SequenceExpression,
}

impl NodeKind {
    /// Function-like nodes open a new renaming scope.
    pub fn is_function(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunctionExpression
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl SyntaxNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SyntaxNode::Program { .. } => NodeKind::Program,
            SyntaxNode::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            SyntaxNode::BlockStatement { .. } => NodeKind::BlockStatement,
            SyntaxNode::ReturnStatement { .. } => NodeKind::ReturnStatement,
            SyntaxNode::IfStatement { .. } => NodeKind::IfStatement,
            SyntaxNode::ForStatement { .. } => NodeKind::ForStatement,
            SyntaxNode::WhileStatement { .. } => NodeKind::WhileStatement,
            SyntaxNode::TryStatement { .. } => NodeKind::TryStatement,
            SyntaxNode::CatchClause { .. } => NodeKind::CatchClause,
            SyntaxNode::ThrowStatement { .. } => NodeKind::ThrowStatement,
            SyntaxNode::BreakStatement { .. } => NodeKind::BreakStatement,
            SyntaxNode::ContinueStatement { .. } => NodeKind::ContinueStatement,
            SyntaxNode::LabeledStatement { .. } => NodeKind::LabeledStatement,
            SyntaxNode::SwitchStatement { .. } => NodeKind::SwitchStatement,
            SyntaxNode::SwitchCase { .. } => NodeKind::SwitchCase,
            SyntaxNode::DoWhileStatement { .. } => NodeKind::DoWhileStatement,
            SyntaxNode::ForInStatement { .. } => NodeKind::ForInStatement,
            SyntaxNode::EmptyStatement => NodeKind::EmptyStatement,
            SyntaxNode::DebuggerStatement => NodeKind::DebuggerStatement,
            SyntaxNode::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            SyntaxNode::VariableDeclarator { .. } => NodeKind::VariableDeclarator,
            SyntaxNode::FunctionDeclaration { .. } => NodeKind::FunctionDeclaration,
            SyntaxNode::FunctionExpression { .. } => NodeKind::FunctionExpression,
            SyntaxNode::ArrowFunctionExpression { .. } => NodeKind::ArrowFunctionExpression,
            SyntaxNode::AssignmentPattern { .. } => NodeKind::AssignmentPattern,
            SyntaxNode::RestElement { .. } => NodeKind::RestElement,
            SyntaxNode::Identifier { .. } => NodeKind::Identifier,
            SyntaxNode::Literal { .. } => NodeKind::Literal,
            SyntaxNode::ThisExpression => NodeKind::ThisExpression,
            SyntaxNode::ArrayExpression { .. } => NodeKind::ArrayExpression,
            SyntaxNode::ObjectExpression { .. } => NodeKind::ObjectExpression,
            SyntaxNode::Property { .. } => NodeKind::Property,
            SyntaxNode::MemberExpression { .. } => NodeKind::MemberExpression,
            SyntaxNode::CallExpression { .. } => NodeKind::CallExpression,
            SyntaxNode::NewExpression { .. } => NodeKind::NewExpression,
            SyntaxNode::UnaryExpression { .. } => NodeKind::UnaryExpression,
            SyntaxNode::UpdateExpression { .. } => NodeKind::UpdateExpression,
            SyntaxNode::BinaryExpression { .. } => NodeKind::BinaryExpression,
            SyntaxNode::LogicalExpression { .. } => NodeKind::LogicalExpression,
            SyntaxNode::AssignmentExpression { .. } => NodeKind::AssignmentExpression,
            SyntaxNode::ConditionalExpression { .. } => NodeKind::ConditionalExpression,
            SyntaxNode::SequenceExpression { .. } => NodeKind::SequenceExpression,
        }
    }

    /// Name of an `Identifier` node.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            SyntaxNode::Identifier { name } => Some(name),
            _ => None,
        }
    }

    // =========================================================================
    // Constructors (used by transforms and tests)
    // =========================================================================

    pub fn identifier(name: impl Into<String>) -> Self {
        SyntaxNode::Identifier { name: name.into() }
    }

    pub fn literal(value: LiteralValue) -> Self {
        SyntaxNode::Literal {
            value,
            raw: None,
            verbatim: None,
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::literal(LiteralValue::String(value.into()))
    }

    pub fn number_literal(value: f64) -> Self {
        Self::literal(LiteralValue::Number(value))
    }

    pub fn boolean_literal(value: bool) -> Self {
        Self::literal(LiteralValue::Boolean(value))
    }

    pub fn program(body: Vec<SyntaxNode>) -> Self {
        SyntaxNode::Program { body }
    }

    pub fn block(body: Vec<SyntaxNode>) -> Self {
        SyntaxNode::BlockStatement { body }
    }

    pub fn expression_statement(expression: SyntaxNode) -> Self {
        SyntaxNode::ExpressionStatement {
            expression: Box::new(expression),
            directive: None,
        }
    }

    /// `'use strict';` style prologue entry.
    pub fn directive(text: impl Into<String>) -> Self {
        let text = text.into();
        SyntaxNode::ExpressionStatement {
            expression: Box::new(Self::string_literal(text.clone())),
            directive: Some(text),
        }
    }

    pub fn return_statement(argument: Option<SyntaxNode>) -> Self {
        SyntaxNode::ReturnStatement {
            argument: argument.map(Box::new),
        }
    }

    /// `kind name = init;` with a single declarator.
    pub fn variable(kind: DeclarationKind, name: impl Into<String>, init: Option<SyntaxNode>) -> Self {
        SyntaxNode::VariableDeclaration {
            declarations: vec![SyntaxNode::VariableDeclarator {
                id: Box::new(Self::identifier(name)),
                init: init.map(Box::new),
            }],
            kind,
        }
    }

    pub fn function_declaration(
        name: impl Into<String>,
        params: Vec<SyntaxNode>,
        body: Vec<SyntaxNode>,
    ) -> Self {
        SyntaxNode::FunctionDeclaration {
            id: Some(Box::new(Self::identifier(name))),
            params,
            body: Box::new(Self::block(body)),
            generator: false,
            is_async: false,
        }
    }

    pub fn function_expression(params: Vec<SyntaxNode>, body: Vec<SyntaxNode>) -> Self {
        SyntaxNode::FunctionExpression {
            id: None,
            params,
            body: Box::new(Self::block(body)),
            generator: false,
            is_async: false,
        }
    }

    pub fn member(object: SyntaxNode, property: SyntaxNode, computed: bool) -> Self {
        SyntaxNode::MemberExpression {
            computed,
            object: Box::new(object),
            property: Box::new(property),
        }
    }

    pub fn call(callee: SyntaxNode, arguments: Vec<SyntaxNode>) -> Self {
        SyntaxNode::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn binary(operator: impl Into<String>, left: SyntaxNode, right: SyntaxNode) -> Self {
        SyntaxNode::BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn object(properties: Vec<SyntaxNode>) -> Self {
        SyntaxNode::ObjectExpression { properties }
    }

    /// `key: value` property with an identifier key.
    pub fn property(key: impl Into<String>, value: SyntaxNode) -> Self {
        SyntaxNode::Property {
            key: Box::new(Self::identifier(key)),
            value: Box::new(value),
            computed: false,
            shorthand: false,
            method: false,
            kind: PropertyKind::Init,
        }
    }

    /// `{ name }` shorthand property.
    pub fn shorthand_property(name: impl Into<String>) -> Self {
        let name = name.into();
        SyntaxNode::Property {
            key: Box::new(Self::identifier(name.clone())),
            value: Box::new(Self::identifier(name)),
            computed: false,
            shorthand: true,
            method: false,
            kind: PropertyKind::Init,
        }
    }
}
