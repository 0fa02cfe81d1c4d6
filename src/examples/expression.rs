//! An arithmetic expression grammar with the usual precedence layering,
//! written with left recursion the way bottom-up grammars are.

use crate::{Language, MetaParser};

/// The grammar definition text.
pub const EXPRESSION_GRAMMAR: &str = r#"
ignored-chars = " \t";
lexeme number = "[0-9]+";
lexeme id = "[a-zA-Z_][a-zA-Z0-9_]*";

expr   : expr "+" term | expr "-" term | term ;
term   : term "*" factor | term "/" factor | factor ;
factor : "(" expr ")" | $number | $id ;
"#;

/// Compile the expression grammar with the given meta-grammar handle.
pub fn expression_language(meta: &MetaParser) -> Language {
    Language::compile(meta, EXPRESSION_GRAMMAR).expect("the expression grammar must compile")
}
