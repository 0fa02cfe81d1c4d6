//! End-to-end walks of the whole pipeline: definition text in, tokens and
//! trees out.

use crate::gdef::translate;
use crate::grammar::{Grammar, ProductionRule, Sentence, Symbol};
use crate::{CstNode, Language, MetaParser};

#[test]
fn minimal_list_language_end_to_end() {
    let language = Language::build(
        r#"
        [ignore: true] lexeme ws = " +";
        lexeme int = "[0-9]+";
        start : $int ("," $int)* ;
        "#,
    )
    .unwrap();

    let tokens = language.tokenize("1,2,3").unwrap();
    let typed: Vec<(&str, &str)> = tokens
        .iter()
        .map(|t| (t.token_type.as_ref(), t.value.as_str()))
        .collect();
    assert_eq!(
        typed,
        vec![("int", "1"), (",", ","), ("int", "2"), (",", ","), ("int", "3")]
    );

    let tree = language.parse("1,2,3").unwrap();
    assert_eq!(tree.name().as_ref(), "start");
    let leaves = tree.leaves();
    assert_eq!(leaves[0].start, 0);
    assert_eq!(leaves[0].end, 1);
    assert_eq!(leaves.last().unwrap().end, 5);
}

#[test]
fn separated_list_expands_to_a_right_recursive_chain() {
    let language = Language::build(
        r#"
        lexeme item = "[a-z]";
        list : $item ("," $item)* ;
        "#,
    )
    .unwrap();

    let tree = language.parse_raw("x,y,z").unwrap();

    // The ZeroOrMore auxiliary recurses once per separator pair and ends in
    // an ε node anchored at the end of the input.
    let chain = tree.find_all("M_0_1");
    assert_eq!(chain.len(), 3);
    let terminator = chain.last().unwrap();
    assert!(terminator.children().is_empty());
    assert_eq!(terminator.span().start, 5);
    assert_eq!(terminator.span().end, 5);
}

#[test]
fn canonical_bnf_serialization_round_trips() {
    // A macro-free grammar over keyword terminals prints as valid definition
    // text; recompiling it yields element-equal productions.
    let rules = vec![
        ProductionRule::new(
            Symbol::non_terminal("s"),
            Sentence::new(vec![Symbol::terminal("a"), Symbol::non_terminal("b")]),
        ),
        ProductionRule::new(
            Symbol::non_terminal("b"),
            Sentence::new(vec![Symbol::terminal("b")]),
        ),
    ];
    let grammar = Grammar::new(Symbol::non_terminal("s"), rules);

    let printed = grammar.to_bnf();
    let reparsed = MetaParser::new().parse(&printed).unwrap();
    let definition = translate::translate(&reparsed).unwrap();
    let rebuilt = Grammar::new(definition.start, definition.rules);

    assert_eq!(rebuilt.rules(), grammar.rules());
    assert_eq!(rebuilt.start(), grammar.start());
}

#[test]
fn empty_input_tokenizes_cleanly_everywhere() {
    let language = Language::build(
        r#"
        ignored-chars = " ";
        lexeme int = "[0-9]+";
        start : $int ;
        "#,
    )
    .unwrap();

    assert!(language.tokenize("").unwrap().is_empty());
    assert!(language.tokenize("   ").unwrap().is_empty());
    // The grammar does not accept ε, so parsing the empty input fails.
    assert!(language.parse("").is_err());
}

#[test]
fn compiled_languages_are_reusable_across_parses() {
    let language = Language::build(
        r#"
        lexeme int = "[0-9]+";
        start : $int ("," $int)* ;
        "#,
    )
    .unwrap();

    for source in ["1", "1,2", "9,8,7,6"] {
        let tree: CstNode = language.parse(source).unwrap();
        assert_eq!(tree.name().as_ref(), "start");
        assert_eq!(tree.span().end, source.chars().count());
    }
}
