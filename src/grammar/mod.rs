//! The symbol and grammar model.
//!
//! A [Grammar] is an ordered list of [ProductionRule]s over [Symbol]s. Bodies
//! are [Sentence]s which may still contain EBNF macro symbols (grouping,
//! `?`, `*`, `+`, alternation); [Grammar::expand_macros] rewrites them into
//! pure BNF before LR construction. The `ε` name is reserved for the epsilon
//! singleton and the end-of-input marker is a symbol of its own, distinct
//! from every source-character terminal.

mod expansion;
mod rule;
mod sentence;
mod symbol;

#[cfg(test)]
mod __tests__;

use crate::error::GrammarError;
use std::collections::HashSet;
use std::rc::Rc;

/// Reserved display name of the epsilon symbol.
pub const EPSILON_NAME: &str = "ε";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A grammar symbol.
///
/// Terminals and non-terminals are compared by name; [Symbol::Epsilon] and
/// [Symbol::EndOfInput] are singletons. Macro symbols only survive until
/// [Grammar::expand_macros] has run.
pub enum Symbol {
    Terminal(Rc<str>),
    NonTerminal(Rc<str>),
    Epsilon,
    EndOfInput,
    Macro(MacroSymbol),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// An EBNF macro operator embedded in a sentence.
pub enum MacroSymbol {
    /// `( x₁ … x_k )`
    Grouping(Vec<Symbol>),
    /// `X?`
    Nullable(Box<Symbol>),
    /// `X*`
    ZeroOrMore(Box<Symbol>),
    /// `X+`
    OneOrMore(Box<Symbol>),
    /// The `|` punctuation. Never survives [Sentence] construction.
    Pipe,
    /// The realized form of pipe punctuation: a set of alternative
    /// sub-sentences.
    Alternative(Vec<Sentence>),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// An immutable ordered sequence of symbols.
///
/// Construction flattens embedded [MacroSymbol::Pipe] symbols into a single
/// [MacroSymbol::Alternative] wrapping the pre- and post-pipe sub-sentences,
/// so a built sentence never contains a raw pipe.
pub struct Sentence {
    symbols: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A production rule `head : body ;` where the head is a non-terminal.
pub struct ProductionRule {
    head: Symbol,
    body: Sentence,
}

#[derive(Debug, Clone)]
/// A context-free grammar: non-terminals, terminals, an ordered production
/// list and a start symbol.
///
/// The production order is preserved from the source because it is the
/// tie-break for reduce numbering in the LR table.
pub struct Grammar {
    non_terminals: Vec<Symbol>,
    terminals: Vec<Symbol>,
    rules: Vec<ProductionRule>,
    start: Symbol,
}

/// Validate a terminal or non-terminal name: non-empty, whitespace-free and
/// not the reserved ε name.
pub fn validate_name(name: &str) -> Result<(), GrammarError> {
    if name.is_empty() {
        return Err(GrammarError::InvalidName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }
    if name.chars().any(|c| c.is_whitespace()) {
        return Err(GrammarError::InvalidName {
            name: name.to_string(),
            reason: "name contains whitespace",
        });
    }
    if name == EPSILON_NAME {
        return Err(GrammarError::InvalidName {
            name: name.to_string(),
            reason: "the ε name is reserved",
        });
    }
    Ok(())
}

impl Grammar {
    /// Build a grammar from a start symbol and an ordered rule list.
    ///
    /// Non-terminals are collected from rule heads and terminals from rule
    /// bodies, both deduplicated by name in first-appearance order. Whether
    /// every referenced non-terminal is actually defined is checked at
    /// augmentation time, not here.
    pub fn new(start: Symbol, rules: Vec<ProductionRule>) -> Self {
        debug_assert!(start.is_non_terminal(), "start symbol must be a non-terminal");
        let mut non_terminals: Vec<Symbol> = Vec::new();
        let mut nt_seen: HashSet<Rc<str>> = HashSet::new();
        for rule in &rules {
            let name = rule.head().name().expect("head is a non-terminal");
            if nt_seen.insert(name.clone()) {
                non_terminals.push(rule.head().clone());
            }
        }

        let mut terminals: Vec<Symbol> = Vec::new();
        let mut t_seen: HashSet<Rc<str>> = HashSet::new();
        for rule in &rules {
            collect_terminal_names(rule.body().symbols(), &mut terminals, &mut t_seen);
        }

        Self {
            non_terminals,
            terminals,
            rules,
            start,
        }
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn rules(&self) -> &[ProductionRule] {
        &self.rules
    }

    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// Indices of the rules defining `head`, in source order.
    pub fn rules_for(&self, head: &Symbol) -> Vec<usize> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| if rule.head() == head { Some(index) } else { None })
            .collect()
    }

    /// Whether the symbol is a terminal or non-terminal of this grammar.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match symbol {
            Symbol::Terminal(_) => self.terminals.contains(symbol),
            Symbol::NonTerminal(_) => self.non_terminals.contains(symbol),
            _ => false,
        }
    }

    /// Whether any rule body still mentions a macro symbol. Gates
    /// [Grammar::expand_macros].
    pub fn contains_macro(&self) -> bool {
        self.rules.iter().any(|rule| rule.body().contains_macro())
    }

    /// Prepend a fresh start symbol `S′` with the single rule `S′ → S`.
    ///
    /// Also checks that every non-terminal appearing in a body has at least
    /// one defining rule; all undefined references are reported together.
    pub fn augment(&self) -> Result<Grammar, Vec<GrammarError>> {
        let mut errors: Vec<GrammarError> = Vec::new();
        let defined: HashSet<Rc<str>> = self
            .non_terminals
            .iter()
            .filter_map(|nt| nt.name().cloned())
            .collect();
        let mut reported: HashSet<Rc<str>> = HashSet::new();
        for rule in &self.rules {
            for symbol in rule.body().iter() {
                if let Symbol::NonTerminal(name) = symbol {
                    if !defined.contains(name) && reported.insert(name.clone()) {
                        errors.push(GrammarError::UndefinedNonTerminal {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }
        if !defined.contains(self.start.name().expect("start is a non-terminal")) {
            errors.push(GrammarError::UndefinedNonTerminal {
                name: self.start.name().expect("start is a non-terminal").to_string(),
            });
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut fresh = format!("{}'", self.start.name().expect("start is a non-terminal"));
        while defined.contains(fresh.as_str()) {
            fresh.push('\'');
        }
        let augmented_start = Symbol::non_terminal(&fresh);
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        rules.push(ProductionRule::new(
            augmented_start.clone(),
            Sentence::new(vec![self.start.clone()]),
        ));
        rules.extend(self.rules.iter().cloned());
        Ok(Grammar::new(augmented_start, rules))
    }

    /// Serialize the grammar to its canonical BNF form, one rule per line.
    pub fn to_bnf(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(&format!("{}\n", rule));
        }
        out
    }
}

pub(crate) fn collect_terminal_names(symbols: &[Symbol], into: &mut Vec<Symbol>, seen: &mut HashSet<Rc<str>>) {
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(name) => {
                if seen.insert(name.clone()) {
                    into.push(symbol.clone());
                }
            }
            Symbol::Macro(m) => match m {
                MacroSymbol::Grouping(inner) => collect_terminal_names(inner, into, seen),
                MacroSymbol::Nullable(inner)
                | MacroSymbol::ZeroOrMore(inner)
                | MacroSymbol::OneOrMore(inner) => {
                    collect_terminal_names(std::slice::from_ref(inner), into, seen)
                }
                MacroSymbol::Alternative(sentences) => {
                    for sentence in sentences {
                        collect_terminal_names(sentence.symbols(), into, seen);
                    }
                }
                MacroSymbol::Pipe => {}
            },
            _ => {}
        }
    }
}
