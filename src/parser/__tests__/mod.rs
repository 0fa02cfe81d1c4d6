use crate::parser::{CstNode, LrParser};
use crate::grammar::{Grammar, ProductionRule, Sentence, Symbol};
use crate::tokenizer::{Token, TokenStream};
use std::collections::HashSet;
use std::rc::Rc;

fn token(token_type: &str, value: &str, start: usize) -> Token {
    Token {
        token_type: Rc::from(token_type),
        value: value.to_string(),
        start,
        end: start + value.chars().count(),
        line: 1,
        column: start + 1,
    }
}

/// list : int ("," int)* ; over terminals int and ",".
fn list_parser() -> LrParser {
    let int = Symbol::terminal("int");
    let comma = Symbol::terminal(",");
    let tail = Symbol::zero_or_more(Symbol::grouping(vec![comma, int.clone()]));
    let rule = ProductionRule::new(
        Symbol::non_terminal("list"),
        Sentence::new(vec![int, tail]),
    );
    LrParser::new(&Grammar::new(Symbol::non_terminal("list"), vec![rule])).unwrap()
}

/// Tokens for "1,2,3".
fn list_tokens() -> Vec<Token> {
    vec![
        token("int", "1", 0),
        token(",", ",", 1),
        token("int", "2", 2),
        token(",", ",", 3),
        token("int", "3", 4),
    ]
}

#[test]
fn parses_a_separated_list() {
    let parser = list_parser();
    let tokens = list_tokens();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let tree = parser.parse(&stream).unwrap();

    assert!(tree.is_root());
    assert_eq!(tree.name().as_ref(), "list");
    assert_eq!(tree.span().start, 0);
    assert_eq!(tree.span().end, 5);
}

#[test]
fn leaf_sequence_equals_the_token_stream() {
    let parser = list_parser();
    let tokens = list_tokens();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let tree = parser.parse(&stream).unwrap();

    let leaves = tree.leaves();
    assert_eq!(leaves.len(), tokens.len());
    for (leaf, token) in leaves.iter().zip(&tokens) {
        assert_eq!(*leaf, token);
    }
}

#[test]
fn epsilon_reduction_anchors_at_the_previous_token_end() {
    let parser = list_parser();
    let tokens = list_tokens();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let tree = parser.parse(&stream).unwrap();

    // The right-recursive tail terminates in an ε internal node whose span
    // is a zero-length anchor at position 5.
    let mut epsilon_nodes: Vec<&CstNode> = Vec::new();
    collect_empty_internals(&tree, &mut epsilon_nodes);
    assert_eq!(epsilon_nodes.len(), 1);
    assert_eq!(epsilon_nodes[0].span().start, 5);
    assert_eq!(epsilon_nodes[0].span().end, 5);
}

fn collect_empty_internals<'t>(node: &'t CstNode, into: &mut Vec<&'t CstNode>) {
    if !node.is_leaf() && node.children().is_empty() {
        into.push(node);
    }
    for child in node.children() {
        collect_empty_internals(child, into);
    }
}

#[test]
fn right_recursive_chain_depth_matches_the_separator_count() {
    let parser = list_parser();
    let tokens = list_tokens();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let tree = parser.parse(&stream).unwrap();

    // "1,2,3" has two separated items, so the ZeroOrMore auxiliary repeats
    // twice before the ε terminator: three auxiliary nodes in a chain.
    let chain = tree.find_all("M_0_1");
    assert_eq!(chain.len(), 3);
    assert!(chain[2].children().is_empty());
}

#[test]
fn reduce_prunes_auxiliary_nodes_but_keeps_leaves() {
    let parser = list_parser();
    let tokens = list_tokens();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let tree = parser.parse(&stream).unwrap();

    let whitelist: HashSet<Rc<str>> = [Rc::from("list")].into_iter().collect();
    let reduced = tree.reduce(&whitelist);

    assert!(!reduced.contains("M_0_0"));
    assert!(!reduced.contains("M_0_1"));
    // Every token survives, inlined under the root, in document order.
    let leaves = reduced.leaves();
    assert_eq!(leaves.len(), tokens.len());
    assert_eq!(
        leaves.iter().map(|t| t.value.as_str()).collect::<Vec<_>>(),
        vec!["1", ",", "2", ",", "3"]
    );
}

#[test]
fn syntax_error_carries_token_and_state() {
    let parser = list_parser();
    let tokens = vec![token("int", "1", 0), token(",", ",", 1), token(",", ",", 2)];
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let err = parser.parse(&stream).unwrap_err();

    let offending = err.token.expect("the lookahead is a real token");
    assert_eq!(offending.value, ",");
    assert_eq!(err.position, 2);
}

#[test]
fn syntax_error_at_end_of_input() {
    let parser = list_parser();
    let tokens = vec![token("int", "1", 0), token(",", ",", 1)];
    let stream = TokenStream::new(&tokens, &HashSet::new());
    let err = parser.parse(&stream).unwrap_err();

    assert!(err.token.is_none());
    assert_eq!(err.position, 2);
}

#[test]
fn empty_input_fails_unless_the_grammar_accepts_epsilon() {
    let parser = list_parser();
    let tokens: Vec<Token> = Vec::new();
    let stream = TokenStream::new(&tokens, &HashSet::new());
    assert!(parser.parse(&stream).is_err());

    // s : int? ; does accept the empty stream.
    let rule = ProductionRule::new(
        Symbol::non_terminal("s"),
        Sentence::new(vec![Symbol::nullable(Symbol::terminal("int"))]),
    );
    let nullable_parser =
        LrParser::new(&Grammar::new(Symbol::non_terminal("s"), vec![rule])).unwrap();
    let tree = nullable_parser.parse(&stream).unwrap();
    assert!(tree.is_root());
    assert_eq!(tree.span(), crate::parser::Span::new(0, 0));
}

#[test]
fn ignored_tokens_are_invisible_to_the_parser() {
    let parser = list_parser();
    let tokens = vec![
        token("int", "1", 0),
        token("ws", " ", 1),
        token(",", ",", 2),
        token("int", "2", 3),
    ];
    let ignored: HashSet<Rc<str>> = [Rc::from("ws")].into_iter().collect();
    let stream = TokenStream::new(&tokens, &ignored);
    let tree = parser.parse(&stream).unwrap();
    assert_eq!(tree.leaves().len(), 3);
}
