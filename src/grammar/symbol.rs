use super::{MacroSymbol, Sentence, Symbol, EPSILON_NAME};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Symbol {
    /// Create a terminal symbol. The name must be non-empty, whitespace-free
    /// and not the reserved ε name; user supplied names are checked with
    /// [validate_name](super::validate_name) before reaching here.
    pub fn terminal(name: &str) -> Self {
        debug_assert!(super::validate_name(name).is_ok(), "invalid terminal name");
        Symbol::Terminal(Rc::from(name))
    }

    pub fn non_terminal(name: &str) -> Self {
        debug_assert!(
            super::validate_name(name).is_ok(),
            "invalid non-terminal name"
        );
        Symbol::NonTerminal(Rc::from(name))
    }

    pub fn epsilon() -> Self {
        Symbol::Epsilon
    }

    pub fn end_of_input() -> Self {
        Symbol::EndOfInput
    }

    pub fn grouping(symbols: Vec<Symbol>) -> Self {
        Symbol::Macro(MacroSymbol::Grouping(symbols))
    }

    pub fn nullable(symbol: Symbol) -> Self {
        Symbol::Macro(MacroSymbol::Nullable(Box::new(symbol)))
    }

    pub fn zero_or_more(symbol: Symbol) -> Self {
        Symbol::Macro(MacroSymbol::ZeroOrMore(Box::new(symbol)))
    }

    pub fn one_or_more(symbol: Symbol) -> Self {
        Symbol::Macro(MacroSymbol::OneOrMore(Box::new(symbol)))
    }

    pub fn pipe() -> Self {
        Symbol::Macro(MacroSymbol::Pipe)
    }

    /// The name of a terminal or non-terminal; [None] for the singletons and
    /// macro symbols.
    pub fn name(&self) -> Option<&Rc<str>> {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Symbol::EndOfInput)
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Symbol::Macro(_))
    }

    pub fn is_pipe(&self) -> bool {
        matches!(self, Symbol::Macro(MacroSymbol::Pipe))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(name) => write!(f, "\"{}\"", name),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
            Symbol::Epsilon => write!(f, "{}", EPSILON_NAME),
            Symbol::EndOfInput => write!(f, "$eoi"),
            Symbol::Macro(m) => write!(f, "{}", m),
        }
    }
}

impl Display for MacroSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MacroSymbol::Grouping(symbols) => {
                write!(f, "(")?;
                for (index, symbol) in symbols.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", symbol)?;
                }
                write!(f, ")")
            }
            MacroSymbol::Nullable(symbol) => write!(f, "{}?", symbol),
            MacroSymbol::ZeroOrMore(symbol) => write!(f, "{}*", symbol),
            MacroSymbol::OneOrMore(symbol) => write!(f, "{}+", symbol),
            MacroSymbol::Pipe => write!(f, "|"),
            MacroSymbol::Alternative(sentences) => {
                write!(f, "(")?;
                for (index, sentence) in sentences.iter().enumerate() {
                    if index > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", sentence)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, symbol) in self.symbols().iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}
