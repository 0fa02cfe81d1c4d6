use crate::examples::json::json_language;
use crate::MetaParser;

#[test]
fn parses_nested_documents() {
    let language = json_language(&MetaParser::new());
    let source = r#"
    {
        "name": "lang-lr",
        "tags": ["parser", "tokenizer"],
        "stable": false,
        "coverage": 98.5,
        "parent": null
    }
    "#;
    let tree = language.parse(source).unwrap();
    assert_eq!(tree.name().as_ref(), "json");
    assert!(tree.contains("object"));
    assert!(tree.contains("array"));
    assert_eq!(tree.find_all("member").len(), 5);
}

#[test]
fn acceptance_agrees_with_serde_json() {
    let language = json_language(&MetaParser::new());

    let valid = [
        r#"{"a": 1, "b": [true, false, null]}"#,
        r#"[]"#,
        r#"{}"#,
        r#"[[1, 2], {"x": "y"}]"#,
        r#""escaped \" quote""#,
        r#"-42"#,
    ];
    for source in valid {
        assert!(
            serde_json::from_str::<serde_json::Value>(source).is_ok(),
            "oracle rejects {:?}",
            source
        );
        assert!(language.parse(source).is_ok(), "we reject {:?}", source);
    }

    let invalid = [
        r#"{"a": }"#,
        r#"[1, , 2]"#,
        r#"{"a" 1}"#,
        r#"[1, 2"#,
        r#"{42: "a"}"#,
    ];
    for source in invalid {
        assert!(
            serde_json::from_str::<serde_json::Value>(source).is_err(),
            "oracle accepts {:?}",
            source
        );
        assert!(language.parse(source).is_err(), "we accept {:?}", source);
    }
}

#[test]
fn leaves_reproduce_the_token_stream() {
    let language = json_language(&MetaParser::new());
    let source = r#"{"k": [1, 2]}"#;
    let tree = language.parse(source).unwrap();

    let leaf_values: Vec<String> = tree
        .leaves()
        .iter()
        .map(|token| token.value.clone())
        .collect();
    assert_eq!(
        leaf_values,
        vec!["{", "\"k\"", ":", "[", "1", ",", "2", "]", "}"]
    );
}

#[test]
fn empty_array_and_object_use_epsilon_reductions() {
    let language = json_language(&MetaParser::new());
    let tree = language.parse_raw("[]").unwrap();

    // The optional member list reduced through ε; its node is a zero-length
    // span anchored after the opening bracket.
    let mut empties = Vec::new();
    collect_empty(&tree, &mut empties);
    assert!(!empties.is_empty());
    for span in &empties {
        assert_eq!(span.start, span.end);
        assert_eq!(span.start, 1);
    }
}

fn collect_empty(node: &crate::CstNode, into: &mut Vec<crate::Span>) {
    if !node.is_leaf() && node.children().is_empty() {
        into.push(node.span());
    }
    for child in node.children() {
        collect_empty(child, into);
    }
}

#[test]
fn tokenization_error_inside_a_document() {
    let language = json_language(&MetaParser::new());
    let err = language.parse(r#"{"a": @}"#).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn syntax_error_reports_the_offending_token() {
    let language = json_language(&MetaParser::new());
    let err = language.parse(r#"{"a": 1,}"#).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    match err {
        crate::ParseError::Syntax(syntax) => {
            assert_eq!(syntax.token.unwrap().value, "}");
        }
        other => panic!("expected a syntax error, found {:?}", other),
    }
}
