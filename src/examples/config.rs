//! A small INI-flavored configuration language, showing fragments, comment
//! lexemes with the ignore annotation, and keyword harvesting.

use crate::{Language, MetaParser};

/// The grammar definition text.
pub const CONFIG_GRAMMAR: &str = r##"
ignored-chars = " \t\r\n";
[ignore: true] lexeme comment = "#[^\n]*";
fragment alpha = "[A-Za-z_]";
fragment digit = "[0-9]";
lexeme key = "{alpha}({alpha}|{digit})*";
lexeme number = "-?{digit}+";
lexeme text = "\"[^\"]*\"";

config     : entry+ ;
entry      : section | assignment ;
section    : "[" $key "]" ;
assignment : $key "=" value ;
value      : $number | $text | "true" | "false" ;
"##;

/// Compile the configuration grammar with the given meta-grammar handle.
pub fn config_language(meta: &MetaParser) -> Language {
    Language::compile(meta, CONFIG_GRAMMAR).expect("the config grammar must compile")
}
