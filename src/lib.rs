//! Language parsing tool (lang_lr) is a library to generate a bottom-up
//! LR(1) parser with a DFA based tokenizer to parse languages or text into a
//! concrete syntax tree ([CST](CstNode)).
//!
//! # Overview
//! Hand-written parsers are expensive to develop and maintain, while parser
//! generators usually compile a grammar ahead of time into target-language
//! source code. This library takes a third route: a grammar written in a
//! small Grammar Definition Format (GDef) is compiled *at runtime* into a
//! pair of table-driven engines (a deterministic longest-match tokenizer
//! and a canonical LR(1) shift-reduce parser) which can then be reused to
//! parse any number of inputs.
//!
//! # Design
//!
//! The compilation pipeline is built from three engines:
//!
//! 1. Lexical rules are parsed into regular expression trees and combined
//!    into a single deterministic automaton through Brzozowski derivatives
//!    (the derivative of a pattern by a character is again a pattern; the
//!    set of reachable simplified derivatives is finite and becomes the DFA
//!    state set). Longest match wins; declaration order breaks ties.
//! 2. The EBNF-style syntax rules (grouping, `?`, `*`, `+`, `|`) are
//!    rewritten into pure BNF by [macro expansion](Grammar::expand_macros),
//!    then the LR(1) item/closure/GOTO fixpoint builds the state set and the
//!    ACTION/GOTO table, reporting every conflict at once.
//! 3. The runtimes drive those tables: the tokenizer emits positioned
//!    [Token]s and the parser builds a [CstNode] tree that preserves every
//!    consumed token and its source span.
//!
//! The grammar definition format itself is parsed by the same engines,
//! bootstrapped on a hardcoded meta-grammar ([MetaParser]).
//!
//! # Example
//!
//! ```
//! use lang_lr::{Language, MetaParser};
//!
//! let meta = MetaParser::new();
//! let language = Language::compile(
//!     &meta,
//!     r#"
//!     ignored-chars = " \t\n";
//!     lexeme int = "[0-9]+";
//!     list : $int ("," $int)* ;
//!     "#,
//! )
//! .unwrap();
//!
//! let tree = language.parse("1, 2, 3").unwrap();
//! assert_eq!(tree.name().as_ref(), "list");
//! assert_eq!(tree.leaves().len(), 5);
//! ```
//!
//! # License
//! [lang_lr](crate) is provided under the MIT license.

mod error;
mod language;

pub mod examples;
pub mod gdef;
pub mod grammar;
pub mod lr;
pub mod parser;
pub mod regex;
pub mod tokenizer;
pub mod util;

pub use error::{
    BuildError, GrammarError, LrConflict, ParseError, RegexError, SyntaxError, TokenizeError,
};
pub use gdef::MetaParser;
pub use grammar::{Grammar, MacroSymbol, ProductionRule, Sentence, Symbol};
pub use language::Language;
pub use parser::{CstNode, LrParser, Span};
pub use regex::{Charset, DerivativeCalculator, Lexeme, RegexNode};
pub use tokenizer::{DfaBuilder, Token, TokenStream, Tokenizer, TokenizerTable};
pub use util::{Code, Log, Position};
