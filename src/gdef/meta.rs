//! The hardcoded meta-grammar: the lexemes and productions of the grammar
//! definition format itself, built with the crate's own constructors.

use crate::grammar::{Grammar, ProductionRule, Sentence, Symbol};
use crate::regex::{Charset, Lexeme, RegexNode};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Reserved keywords of the format, in priority order.
pub(crate) const KEYWORDS: [&str; 8] = [
    "lexeme",
    "fragment",
    "ignored-chars",
    "charset",
    "ignore",
    "true",
    "false",
    "placeholder",
];

const PUNCTUATION: [char; 14] = [
    '[', ']', ',', ':', ';', '=', '>', '(', ')', '?', '*', '+', '|', '$',
];

/// The meta lexemes, the skipped characters and the meta grammar.
pub(crate) fn meta_definition() -> (Vec<Lexeme>, Vec<char>, Grammar) {
    let charset = Rc::new(Charset::ascii());

    let mut lexemes: Vec<Lexeme> = Vec::new();
    for keyword in KEYWORDS {
        lexemes.push(Lexeme::new(
            keyword,
            RegexNode::literal_sequence(keyword),
            false,
            Rc::clone(&charset),
        ));
    }
    for punctuation in PUNCTUATION {
        lexemes.push(Lexeme::new(
            &punctuation.to_string(),
            RegexNode::literal(punctuation),
            false,
            Rc::clone(&charset),
        ));
    }
    lexemes.push(Lexeme::new(
        "id",
        id_pattern(),
        false,
        Rc::clone(&charset),
    ));
    lexemes.push(Lexeme::new(
        "string",
        string_pattern(&charset),
        false,
        Rc::clone(&charset),
    ));

    (lexemes, vec![' ', '\t', '\r', '\n'], meta_grammar())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn id_pattern() -> Rc<RegexNode> {
    let head = char_class(&[('A', 'Z'), ('a', 'z')], &['_']);
    let tail = char_class(&[('A', 'Z'), ('a', 'z'), ('0', '9')], &['_']);
    RegexNode::concat(head, RegexNode::star(tail))
}

/// A double-quoted string: `"` then escape pairs or plain characters, then
/// `"`.
fn string_pattern(charset: &Rc<Charset>) -> Rc<RegexNode> {
    let escape = RegexNode::concat(
        RegexNode::literal('\\'),
        RegexNode::anything(Rc::clone(charset)),
    );
    let plain = RegexNode::class(
        Rc::clone(charset),
        true,
        BTreeSet::from(['"', '\\']),
    );
    RegexNode::concat_all(vec![
        RegexNode::literal('"'),
        RegexNode::star(RegexNode::union(escape, plain)),
        RegexNode::literal('"'),
    ])
}

fn char_class(ranges: &[(char, char)], singles: &[char]) -> Rc<RegexNode> {
    let mut chars: BTreeSet<char> = BTreeSet::new();
    for &(from, to) in ranges {
        chars.extend((from as u32..=to as u32).filter_map(char::from_u32));
    }
    chars.extend(singles.iter().copied());
    RegexNode::class(Rc::new(Charset::ascii()), false, chars)
}

/// The productions of the format, mirroring its own EBNF description:
///
/// ```text
/// grammar      : setting* production+ ;
/// setting      : lexeme_decl | fragment_decl | ignored_decl ;
/// lexeme_decl  : annotations? "lexeme" id "=" string ";" ;
/// annotations  : "[" annotation ("," annotation)* "]" ;
/// annotation   : "charset" ":" string | "ignore" ":" bool_value ;
/// bool_value   : "true" | "false" ;
/// fragment_decl: "fragment" id "=" string ";" ;
/// ignored_decl : "ignored-chars" "=" string ";" ;
/// production   : id ":" symbol+ action_decl? ";" ;
/// action_decl  : "=" ">" "placeholder" ;
/// symbol       : string | "$" id | id | macro_sym ;
/// macro_sym    : "(" symbol+ ")" | symbol "?" | symbol "*" | symbol "+" | "|" ;
/// ```
fn meta_grammar() -> Grammar {
    let t = Symbol::terminal;
    let nt = Symbol::non_terminal;
    let rule = |head: &str, body: Vec<Symbol>| {
        ProductionRule::new(Symbol::non_terminal(head), Sentence::new(body))
    };

    let rules = vec![
        rule(
            "grammar",
            vec![
                Symbol::zero_or_more(nt("setting")),
                Symbol::one_or_more(nt("production")),
            ],
        ),
        rule("setting", vec![nt("lexeme_decl")]),
        rule("setting", vec![nt("fragment_decl")]),
        rule("setting", vec![nt("ignored_decl")]),
        rule(
            "lexeme_decl",
            vec![
                Symbol::nullable(nt("annotations")),
                t("lexeme"),
                t("id"),
                t("="),
                t("string"),
                t(";"),
            ],
        ),
        rule(
            "annotations",
            vec![
                t("["),
                nt("annotation"),
                Symbol::zero_or_more(Symbol::grouping(vec![t(","), nt("annotation")])),
                t("]"),
            ],
        ),
        rule("annotation", vec![t("charset"), t(":"), t("string")]),
        rule("annotation", vec![t("ignore"), t(":"), nt("bool_value")]),
        rule("bool_value", vec![t("true")]),
        rule("bool_value", vec![t("false")]),
        rule(
            "fragment_decl",
            vec![t("fragment"), t("id"), t("="), t("string"), t(";")],
        ),
        rule(
            "ignored_decl",
            vec![t("ignored-chars"), t("="), t("string"), t(";")],
        ),
        rule(
            "production",
            vec![
                t("id"),
                t(":"),
                Symbol::one_or_more(nt("symbol")),
                Symbol::nullable(nt("action_decl")),
                t(";"),
            ],
        ),
        rule("action_decl", vec![t("="), t(">"), t("placeholder")]),
        rule("symbol", vec![t("string")]),
        rule("symbol", vec![t("$"), t("id")]),
        rule("symbol", vec![t("id")]),
        rule("symbol", vec![nt("macro_sym")]),
        rule(
            "macro_sym",
            vec![t("("), Symbol::one_or_more(nt("symbol")), t(")")],
        ),
        rule("macro_sym", vec![nt("symbol"), t("?")]),
        rule("macro_sym", vec![nt("symbol"), t("*")]),
        rule("macro_sym", vec![nt("symbol"), t("+")]),
        rule("macro_sym", vec![t("|")]),
    ];

    Grammar::new(Symbol::non_terminal("grammar"), rules)
}
