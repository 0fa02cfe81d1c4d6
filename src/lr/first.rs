//! FIRST-set computation over a macro-free grammar.

use crate::grammar::{Grammar, Symbol};
use std::collections::BTreeSet;
use std::rc::Rc;

/// FIRST(α) for a sentence α: the terminals that can begin a derivation of
/// α, plus ε when every element of α is nullable.
///
/// Recursion through non-terminals is guarded by a visit stack; a cyclic
/// call contributes nothing and does not set ε.
pub fn first_of_sentence(grammar: &Grammar, symbols: &[Symbol]) -> BTreeSet<Symbol> {
    let mut visiting: Vec<Rc<str>> = Vec::new();
    first_of_slice(grammar, symbols, &mut visiting)
}

fn first_of_slice(
    grammar: &Grammar,
    symbols: &[Symbol],
    visiting: &mut Vec<Rc<str>>,
) -> BTreeSet<Symbol> {
    let mut first: BTreeSet<Symbol> = BTreeSet::new();
    let mut all_nullable = true;
    for symbol in symbols {
        let symbol_first = first_of_symbol(grammar, symbol, visiting);
        let nullable = symbol_first.contains(&Symbol::Epsilon);
        first.extend(
            symbol_first
                .into_iter()
                .filter(|s| !matches!(s, Symbol::Epsilon)),
        );
        if !nullable {
            all_nullable = false;
            break;
        }
    }
    if all_nullable {
        first.insert(Symbol::Epsilon);
    }
    first
}

fn first_of_symbol(
    grammar: &Grammar,
    symbol: &Symbol,
    visiting: &mut Vec<Rc<str>>,
) -> BTreeSet<Symbol> {
    let mut first: BTreeSet<Symbol> = BTreeSet::new();
    match symbol {
        Symbol::Terminal(_) | Symbol::EndOfInput => {
            first.insert(symbol.clone());
        }
        Symbol::Epsilon => {
            first.insert(Symbol::Epsilon);
        }
        Symbol::NonTerminal(name) => {
            if visiting.contains(name) {
                // Cyclic call: contributes nothing.
                return first;
            }
            visiting.push(name.clone());
            for index in grammar.rules_for(symbol) {
                let body = grammar.rules()[index].body();
                first.extend(first_of_slice(grammar, body.symbols(), visiting));
            }
            visiting.pop();
        }
        Symbol::Macro(_) => {
            unreachable!("FIRST is computed over macro-free grammars")
        }
    }
    first
}
