use crate::examples::expression::expression_language;
use crate::MetaParser;

#[test]
fn multiplication_binds_tighter_than_addition() {
    let language = expression_language(&MetaParser::new());
    let tree = language.parse("1 + 2 * 3").unwrap();

    // expr [ expr [ term [ factor [ 1 ] ] ], "+", term [ term, "*", factor ] ]
    assert_eq!(tree.name().as_ref(), "expr");
    let children = tree.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].name().as_ref(), "expr");
    assert_eq!(children[1].name().as_ref(), "+");
    assert_eq!(children[2].name().as_ref(), "term");
    assert!(children[2].contains("*"));
    assert!(!children[0].contains("*"));
}

#[test]
fn left_recursion_associates_left() {
    let language = expression_language(&MetaParser::new());
    let tree = language.parse("a - b - c").unwrap();

    // (a - b) - c: the outer expression's left child holds the first minus.
    let children = tree.children();
    assert_eq!(children[0].name().as_ref(), "expr");
    assert!(children[0].contains("-"));
    assert_eq!(children[2].leaves().len(), 1);
}

#[test]
fn parentheses_override_precedence() {
    let language = expression_language(&MetaParser::new());
    let tree = language.parse("(1 + 2) * 3").unwrap();

    let children = tree.children();
    // The whole parse is one term: term "*" factor.
    assert_eq!(tree.name().as_ref(), "expr");
    assert_eq!(children.len(), 1);
    let term = &children[0];
    assert_eq!(term.name().as_ref(), "term");
    assert!(term.children()[0].contains("("));
}

#[test]
fn root_span_covers_the_source() {
    let language = expression_language(&MetaParser::new());
    let source = "x * (y + 1)";
    let tree = language.parse(source).unwrap();
    assert_eq!(tree.span().start, 0);
    assert_eq!(tree.span().end, source.chars().count());
}

#[test]
fn division_by_anything_is_still_syntax() {
    let language = expression_language(&MetaParser::new());
    assert!(language.parse("a / b / c").is_ok());
    assert!(language.parse("a / / b").is_err());
    assert!(language.parse("").is_err());
}
