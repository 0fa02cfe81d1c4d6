//! Error types surfaced at the API boundary.
//!
//! Build-time failures ([GrammarError], [RegexError], [LrConflict]) are
//! aggregated into a list so a user sees every duplicate lexeme, undefined
//! non-terminal and table conflict at once. Runtime failures
//! ([TokenizeError], [SyntaxError]) fail fast; the tokenizer and parser do
//! not attempt any local recovery.

use crate::grammar::Symbol;
use crate::lr::LrAction;
use crate::tokenizer::{Token, TransitionTrace};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An error raised while translating a grammar definition into lexemes and
/// production rules.
pub enum GrammarError {
    /// A lexeme name was declared more than once; carries every declaration
    /// index in source order.
    DuplicateLexeme { name: String, occurrences: Vec<usize> },
    /// A non-terminal is referenced in a production body but never defined.
    UndefinedNonTerminal { name: String },
    /// A lexeme pattern matches the empty string and would loop the
    /// tokenizer forever.
    NullableLexeme { name: String },
    UnknownCharset { value: String },
    UnknownAnnotation { key: String, value: String },
    InvalidName { name: String, reason: &'static str },
    /// The definition contains no production rule.
    EmptyGrammar,
    /// The grammar definition text itself failed to tokenize or parse.
    MalformedDefinition { position: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An error raised while parsing a lexeme pattern into a regular expression.
pub enum RegexError {
    MalformedPattern {
        pattern: String,
        position: usize,
        message: String,
    },
    /// A character class range `x-y` where `x` sorts after `y`.
    EmptyRange { from: char, to: char },
    /// A `{name}` reference to a fragment that was never declared.
    UnknownFragment { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A cell of the LR table that two or more actions landed on. Every conflict
/// across the grammar is collected before the build aborts.
pub struct LrConflict {
    pub state: usize,
    pub symbol: Symbol,
    pub actions: Vec<LrAction>,
}

impl LrConflict {
    /// A short label of the conflict shape, e.g. `shift/reduce`.
    pub fn kind(&self) -> String {
        let mut labels: Vec<&'static str> = self
            .actions
            .iter()
            .map(|action| match action {
                LrAction::Shift(_) => "shift",
                LrAction::Reduce(_) => "reduce",
                LrAction::Goto(_) => "goto",
                LrAction::Accept => "accept",
            })
            .collect();
        labels.sort();
        labels.join("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A build-time error. Compilation returns every build error it can find
/// rather than stopping at the first one.
pub enum BuildError {
    Grammar(GrammarError),
    Regex(RegexError),
    Conflict(LrConflict),
}

impl BuildError {
    /// Process exit code for a command line wrapper.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

#[derive(Debug, Clone)]
/// An error raised while converting the character stream into tokens.
pub enum TokenizeError {
    UnexpectedCharacter {
        character: char,
        position: usize,
        line: usize,
        column: usize,
        state_name: String,
        /// Transition history of the current token. Populated only in debug
        /// builds when a log label is set on the tokenizer.
        history: Vec<TransitionTrace>,
    },
    /// End of input reached while the automaton was mid-token in a
    /// non-accepting state.
    UnexpectedEndOfInput {
        position: usize,
        line: usize,
        column: usize,
        state_name: String,
    },
}

impl TokenizeError {
    pub fn position(&self) -> usize {
        match self {
            TokenizeError::UnexpectedCharacter { position, .. }
            | TokenizeError::UnexpectedEndOfInput { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone)]
/// The parser found no action for the current state and lookahead.
pub struct SyntaxError {
    /// The offending token, or [None] when the lookahead was end of input.
    pub token: Option<Token>,
    pub position: usize,
    pub state: usize,
}

#[derive(Debug, Clone)]
/// A runtime failure while turning input text into a syntax tree.
pub enum ParseError {
    Tokenize(TokenizeError),
    Syntax(SyntaxError),
}

impl ParseError {
    /// Process exit code for a command line wrapper: 3 for tokenization
    /// failures, 4 for syntax errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParseError::Tokenize(_) => 3,
            ParseError::Syntax(_) => 4,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Tokenize(err) => err.position(),
            ParseError::Syntax(err) => err.position,
        }
    }
}

impl From<GrammarError> for BuildError {
    fn from(err: GrammarError) -> Self {
        BuildError::Grammar(err)
    }
}
impl From<RegexError> for BuildError {
    fn from(err: RegexError) -> Self {
        BuildError::Regex(err)
    }
}
impl From<LrConflict> for BuildError {
    fn from(err: LrConflict) -> Self {
        BuildError::Conflict(err)
    }
}
impl From<TokenizeError> for ParseError {
    fn from(err: TokenizeError) -> Self {
        ParseError::Tokenize(err)
    }
}
impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::DuplicateLexeme { name, occurrences } => write!(
                f,
                "GrammarError: lexeme '{}' is declared {} times (declarations {:?}).",
                name,
                occurrences.len(),
                occurrences
            ),
            GrammarError::UndefinedNonTerminal { name } => write!(
                f,
                "GrammarError: non-terminal '{}' is referenced but has no production rule.",
                name
            ),
            GrammarError::NullableLexeme { name } => write!(
                f,
                "GrammarError: pattern of lexeme '{}' matches the empty string.",
                name
            ),
            GrammarError::UnknownCharset { value } => {
                write!(f, "GrammarError: unknown charset '{}'.", value)
            }
            GrammarError::UnknownAnnotation { key, value } => {
                write!(f, "GrammarError: unknown annotation '{}: {}'.", key, value)
            }
            GrammarError::InvalidName { name, reason } => {
                write!(f, "GrammarError: invalid name '{}': {}.", name, reason)
            }
            GrammarError::EmptyGrammar => {
                write!(f, "GrammarError: the definition contains no production.")
            }
            GrammarError::MalformedDefinition { position, message } => write!(
                f,
                "GrammarError: malformed grammar definition at {}: {}",
                position, message
            ),
        }
    }
}

impl Display for RegexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegexError::MalformedPattern {
                pattern,
                position,
                message,
            } => write!(
                f,
                "RegexError: malformed pattern '{}' at {}: {}",
                pattern, position, message
            ),
            RegexError::EmptyRange { from, to } => {
                write!(f, "RegexError: empty character range '{}-{}'.", from, to)
            }
            RegexError::UnknownFragment { name } => {
                write!(f, "RegexError: unknown fragment '{{{}}}'.", name)
            }
        }
    }
}

impl Display for LrConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LrConflict: {} conflict in state {} on symbol {}: {:?}",
            self.kind(),
            self.state,
            self.symbol,
            self.actions
        )
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Grammar(err) => write!(f, "{}", err),
            BuildError::Regex(err) => write!(f, "{}", err),
            BuildError::Conflict(err) => write!(f, "{}", err),
        }
    }
}

impl Display for TokenizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeError::UnexpectedCharacter {
                character,
                line,
                column,
                state_name,
                ..
            } => write!(
                f,
                "UnexpectedCharacter: '{}' at line {} column {} (state {}).",
                character.escape_default(),
                line,
                column,
                state_name
            ),
            TokenizeError::UnexpectedEndOfInput {
                line,
                column,
                state_name,
                ..
            } => write!(
                f,
                "UnexpectedEndOfInput: at line {} column {} (state {}).",
                line, column, state_name
            ),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(
                f,
                "SyntaxError: unexpected token '{}' ({}) at line {} column {} (state {}).",
                token.value, token.token_type, token.line, token.column, self.state
            ),
            None => write!(
                f,
                "SyntaxError: unexpected end of input at {} (state {}).",
                self.position, self.state
            ),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Tokenize(err) => write!(f, "{}", err),
            ParseError::Syntax(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GrammarError {}
impl std::error::Error for RegexError {}
impl std::error::Error for LrConflict {}
impl std::error::Error for BuildError {}
impl std::error::Error for TokenizeError {}
impl std::error::Error for SyntaxError {}
impl std::error::Error for ParseError {}
