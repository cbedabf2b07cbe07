//! Helpers shared by the integration suites.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::convert::Infallible;
use veil_ast::{LiteralValue, ParentRef, SyntaxNode, VisitMut, walk_mut};

pub fn parse(program: Value) -> SyntaxNode {
    serde_json::from_value(program).expect("valid ESTree program")
}

pub fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

pub fn string(value: &str) -> Value {
    json!({ "type": "Literal", "value": value })
}

pub fn call_statement(callee: &str, arguments: Vec<Value>) -> Value {
    json!({
        "type": "ExpressionStatement",
        "expression": {
            "type": "CallExpression",
            "callee": ident(callee),
            "arguments": arguments
        }
    })
}

pub fn program(body: Vec<Value>) -> Value {
    json!({ "type": "Program", "body": body })
}

/// `(value, verbatim)` of every string literal, in source order.
pub fn string_literals(node: &mut SyntaxNode) -> Vec<(String, Option<String>)> {
    struct Collect(Vec<(String, Option<String>)>);

    impl VisitMut for Collect {
        type Error = Infallible;

        fn enter(&mut self, node: &mut SyntaxNode, _: Option<ParentRef>) -> Result<(), Infallible> {
            if let SyntaxNode::Literal {
                value: LiteralValue::String(value),
                verbatim,
                ..
            } = node
            {
                self.0.push((value.clone(), verbatim.clone()));
            }
            Ok(())
        }
    }

    let mut collect = Collect(Vec::new());
    match walk_mut(node, None, &mut collect) {
        Ok(()) => collect.0,
        Err(never) => match never {},
    }
}

/// Names of every identifier, in source order.
pub fn identifier_names(node: &mut SyntaxNode) -> Vec<String> {
    struct Collect(Vec<String>);

    impl VisitMut for Collect {
        type Error = Infallible;

        fn enter(&mut self, node: &mut SyntaxNode, _: Option<ParentRef>) -> Result<(), Infallible> {
            if let Some(name) = node.identifier_name() {
                self.0.push(name.to_string());
            }
            Ok(())
        }
    }

    let mut collect = Collect(Vec::new());
    match walk_mut(node, None, &mut collect) {
        Ok(()) => collect.0,
        Err(never) => match never {},
    }
}
