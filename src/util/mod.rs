//! Shared utilities: the [Code] wrapper over the input text, line/column
//! [Position] lookup, and the leveled [Log] used to debug the build and
//! runtime engines.

mod code;
mod logger;
mod position;

#[cfg(test)]
mod __tests__;

use once_cell::unsync::OnceCell;

/// Characters that terminate a line for position bookkeeping.
pub const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// A wrapper for the input text to be tokenized or parsed, with lazily built
/// character and line-break tables.
///
/// All positions produced by this crate are 0-based indices into the character
/// sequence of the input, not byte offsets.
pub struct Code<'c> {
    pub text: &'c str,
    chars: OnceCell<Vec<char>>,
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// The line and column information at a code point. Lines and columns are
/// 1-based.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// A enum structure to assign multiple level debugging to the build and
/// runtime engines.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
