//! The grammar definition front-end.
//!
//! The Grammar Definition Format (GDef) combines lexical declarations and an
//! EBNF-style syntax:
//!
//! ```text
//! [ignore: true] lexeme ws = " +";
//! lexeme int = "[0-9]+";
//! list : $int ("," $int)* ;
//! ```
//!
//! The format is parsed by the crate's own engines, bootstrapped on a
//! hardcoded meta-grammar: [MetaParser::new] builds the meta tokenizer and
//! meta LR(1) table once, and [MetaParser::parse] turns definition text into
//! a CST that [translate](translate::translate) walks to produce the user's
//! lexemes and production rules. The handle is immutable and explicitly
//! passed; callers that want to reuse it cache it at their discretion.
//!
//! Reserved keywords: `lexeme`, `fragment`, `ignored-chars`, `charset`,
//! `ignore`, `true`, `false`, `placeholder`. A `$` before an identifier
//! references a lexeme by name; a bare identifier is a non-terminal; a
//! quoted string in a production body is a keyword tokenized against itself.

mod meta;
pub(crate) mod translate;

#[cfg(test)]
mod __tests__;

use crate::error::ParseError;
use crate::parser::{CstNode, LrParser};
use crate::tokenizer::{TokenStream, Tokenizer};
use crate::util::Code;
use std::collections::HashSet;
use std::rc::Rc;

/// The compiled meta-grammar: tokenizer and LR(1) parser for definition
/// text.
pub struct MetaParser {
    tokenizer: Tokenizer,
    parser: LrParser,
    whitelist: HashSet<Rc<str>>,
}

impl Default for MetaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaParser {
    /// Compile the hardcoded meta-grammar. Building it cannot fail unless
    /// the crate itself is broken.
    pub fn new() -> Self {
        let (lexemes, ignored_chars, grammar) = meta::meta_definition();
        let table = crate::tokenizer::DfaBuilder::new(lexemes, &ignored_chars)
            .build_table()
            .expect("the meta tokenizer must build");
        let parser = LrParser::new(&grammar).expect("the meta grammar must be LR(1)");
        let whitelist = grammar
            .non_terminals()
            .iter()
            .filter_map(|nt| nt.name().cloned())
            .collect();
        Self {
            tokenizer: Tokenizer::new(table),
            parser,
            whitelist,
        }
    }

    /// Parse definition text into its CST, with the auxiliary expansion
    /// nodes pruned away.
    pub fn parse(&self, definition: &str) -> Result<CstNode, ParseError> {
        let code = Code::from(definition);
        let tokens = self.tokenizer.tokenize(&code)?;
        let stream = TokenStream::new(&tokens, self.tokenizer.ignored());
        let tree = self.parser.parse(&stream)?;
        Ok(tree.reduce(&self.whitelist))
    }
}
