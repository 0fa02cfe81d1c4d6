//! DFA construction and the table-driven longest-match tokenizer.
//!
//! [DfaBuilder] merges every lexeme pattern into one combined regex and
//! enumerates its reachable Brzozowski derivatives into [Dfa] states; the
//! DFA is then lowered to an immutable [TokenizerTable] whose state 0 is a
//! synthetic gate that skips ignored characters. [Tokenizer] drives the
//! table over a [Code] input and emits positioned [Token]s, choosing the
//! longest match and, on equal length, the earliest declared lexeme.

mod dfa;
mod runtime;
mod stream;

#[cfg(test)]
mod __tests__;

use crate::regex::{DerivativeCalculator, Lexeme, RegexNode};
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// The end-of-input sentinel character.
pub const EOI_CHAR: char = '\0';

#[derive(Debug, Clone, PartialEq, Eq)]
/// A positioned token. `start` is inclusive and `end` exclusive, both
/// 0-based character indices; `line`/`column` are 1-based and point at the
/// first character of the token.
pub struct Token {
    pub token_type: Rc<str>,
    pub value: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One automaton step, recorded per token in debug mode.
pub struct TransitionTrace {
    pub from: usize,
    pub character: char,
    pub to: usize,
    pub position: usize,
}

#[derive(Debug)]
/// A state of the derivative DFA: the derivative regex it stands for, its
/// canonical name and its outgoing transitions. Sink states (empty-set
/// derivatives) are never materialized.
pub struct DfaState {
    pub name: String,
    pub regex: Rc<RegexNode>,
    pub transitions: Vec<(char, usize)>,
    pub accepting: bool,
    /// The earliest declared lexeme accepting in this state, when accepting.
    pub winner: Option<Rc<str>>,
    pub winner_ignored: bool,
}

#[derive(Debug)]
/// The regex DFA produced by [DfaBuilder]; state 0 is the combined initial
/// regex.
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub alphabet: Vec<char>,
}

/// Builds the combined DFA and lowers it to a [TokenizerTable].
pub struct DfaBuilder {
    lexemes: Vec<Lexeme>,
    ignored_chars: Vec<char>,
    complement_chars: Vec<char>,
    calculator: DerivativeCalculator,
    log: OnceCell<Log<&'static str>>,
}

#[derive(Debug, Clone)]
/// A numbered state of the tokenizer table. For accepting states `name` is
/// the winning lexeme's name; `recurse_on_miss` marks that a missing
/// transition ends the current token and restarts the automaton without
/// consuming the lookahead.
pub struct TableState {
    pub id: usize,
    pub name: Rc<str>,
    pub accepting: bool,
    pub recurse_on_miss: bool,
    pub ignored: bool,
    pub transitions: HashMap<char, usize>,
}

#[derive(Debug, Clone)]
/// The immutable tokenizer table. State 0 is the initial gate state; lookup
/// is O(1).
pub struct TokenizerTable {
    states: Vec<TableState>,
}

/// The table-driven longest-match tokenizer runtime.
#[derive(Debug)]
pub struct Tokenizer {
    table: TokenizerTable,
    ignored: HashSet<Rc<str>>,
    log: OnceCell<Log<&'static str>>,
}

#[derive(Debug, Clone)]
/// A wrapper over the tokenized output that applies the ignored-token set at
/// advance time, leaving the underlying stream intact.
pub struct TokenStream<'lex> {
    tokens: &'lex [Token],
    filtered: Vec<usize>,
}
