use super::node::*;

#[test]
fn test_deserialize_estree_member_expression() {
    let json = r#"{
        "type": "MemberExpression",
        "computed": false,
        "object": { "type": "Identifier", "name": "console" },
        "property": { "type": "Identifier", "name": "log" }
    }"#;

    let node: SyntaxNode = serde_json::from_str(json).expect("member expression should parse");
    assert_eq!(
        node,
        SyntaxNode::member(
            SyntaxNode::identifier("console"),
            SyntaxNode::identifier("log"),
            false
        )
    );
}

#[test]
fn test_literal_values() {
    let parse = |json: &str| -> SyntaxNode { serde_json::from_str(json).expect("literal should parse") };

    assert_eq!(
        parse(r#"{"type":"Literal","value":true,"raw":"true"}"#).kind(),
        NodeKind::Literal
    );

    let SyntaxNode::Literal { value, raw, .. } = parse(r#"{"type":"Literal","value":10,"raw":"10"}"#)
    else {
        panic!("expected literal");
    };
    assert_eq!(value, LiteralValue::Number(10.0));
    assert_eq!(raw.as_deref(), Some("10"));

    let SyntaxNode::Literal { value, .. } = parse(r#"{"type":"Literal","value":null}"#) else {
        panic!("expected literal");
    };
    assert_eq!(value, LiteralValue::Null);

    let SyntaxNode::Literal { value, .. } = parse(r#"{"type":"Literal","value":"hi"}"#) else {
        panic!("expected literal");
    };
    assert_eq!(value, LiteralValue::String("hi".to_string()));
}

#[test]
fn test_verbatim_serialized_only_when_set() {
    let plain = serde_json::to_value(SyntaxNode::string_literal("a")).expect("serialize");
    assert!(plain.get("x-verbatim").is_none());

    let replaced = SyntaxNode::Literal {
        value: LiteralValue::String("a".to_string()),
        raw: None,
        verbatim: Some("'\\x61'".to_string()),
    };
    let value = serde_json::to_value(replaced).expect("serialize");
    assert_eq!(value["x-verbatim"], "'\\x61'");
    assert_eq!(value["type"], "Literal");
}

#[test]
fn test_function_declaration_round_trip() {
    let json = r#"{
        "type": "FunctionDeclaration",
        "id": { "type": "Identifier", "name": "add" },
        "params": [
            { "type": "Identifier", "name": "a" },
            { "type": "AssignmentPattern",
              "left": { "type": "Identifier", "name": "b" },
              "right": { "type": "Literal", "value": 1 } }
        ],
        "body": { "type": "BlockStatement", "body": [
            { "type": "ReturnStatement", "argument": {
                "type": "BinaryExpression", "operator": "+",
                "left": { "type": "Identifier", "name": "a" },
                "right": { "type": "Identifier", "name": "b" } } }
        ] },
        "async": false
    }"#;

    let node: SyntaxNode = serde_json::from_str(json).expect("function should parse");
    assert_eq!(node.kind(), NodeKind::FunctionDeclaration);
    assert!(node.kind().is_function());

    let reparsed: SyntaxNode =
        serde_json::from_str(&serde_json::to_string(&node).expect("serialize")).expect("reparse");
    assert_eq!(node, reparsed);
}

#[test]
fn test_unknown_node_type_is_rejected() {
    let result: Result<SyntaxNode, _> = serde_json::from_str(r#"{"type":"ClassDeclaration"}"#);
    assert!(result.is_err());
}

#[test]
fn test_property_missing_key_is_rejected() {
    let result: Result<SyntaxNode, _> = serde_json::from_str(
        r#"{"type":"Property","value":{"type":"Identifier","name":"x"}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_directive_round_trip() {
    let json = r#"{
        "type": "ExpressionStatement",
        "expression": { "type": "Literal", "value": "use strict" },
        "directive": "use strict"
    }"#;

    let node: SyntaxNode = serde_json::from_str(json).expect("directive should parse");
    assert_eq!(node, SyntaxNode::directive("use strict"));

    let value = serde_json::to_value(&node).expect("serializable");
    assert_eq!(value["directive"], "use strict");

    let plain = serde_json::to_value(SyntaxNode::expression_statement(SyntaxNode::identifier("x")))
        .expect("serializable");
    assert!(plain.get("directive").is_none());
}
