//! A JSON grammar: objects, arrays, strings, numbers and the three literal
//! keywords.

use crate::{Language, MetaParser};

/// The grammar definition text.
pub const JSON_GRAMMAR: &str = r#"
ignored-chars = " \t\r\n";
fragment digit = "[0-9]";
lexeme string = "\"([^\"\\\\]|\\\\.)*\"";
lexeme number = "-?{digit}+(\\.{digit}+)?";

json    : value ;
value   : object | array | $string | $number | "true" | "false" | "null" ;
object  : "{" (member ("," member)*)? "}" ;
member  : $string ":" value ;
array   : "[" (value ("," value)*)? "]" ;
"#;

/// Compile the JSON grammar with the given meta-grammar handle.
pub fn json_language(meta: &MetaParser) -> Language {
    Language::compile(meta, JSON_GRAMMAR).expect("the JSON grammar must compile")
}
