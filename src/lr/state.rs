//! Item closure, GOTO and the LR(1) state-set fixpoint.

use super::{first_of_sentence, LrAutomaton, LrItem, LrState};
use crate::grammar::{Grammar, Symbol};
use std::collections::{BTreeSet, HashMap};

impl LrItem {
    pub fn new(production: usize, dot: usize, lookaheads: BTreeSet<Symbol>) -> Self {
        Self {
            production,
            dot,
            lookaheads,
        }
    }

    /// The symbol immediately after the dot, or [None] when the dot is at
    /// the end. Items of ε productions are complete at dot 0.
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        let rule = &grammar.rules()[self.production];
        if rule.is_epsilon() {
            return None;
        }
        rule.body().symbols().get(self.dot)
    }

    /// Whether the dot is at the end of the body.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        let rule = &grammar.rules()[self.production];
        rule.is_epsilon() || self.dot == rule.body().len()
    }

    /// The body slice after the next symbol.
    pub fn beta<'g>(&self, grammar: &'g Grammar) -> &'g [Symbol] {
        let rule = &grammar.rules()[self.production];
        if rule.is_epsilon() || self.dot + 1 > rule.body().len() {
            &[]
        } else {
            &rule.body().symbols()[self.dot + 1..]
        }
    }
}

/// Saturate a kernel into its closure.
///
/// For each item `A → α·Bβ, L` with B a non-terminal, every production
/// `B → γ` gains an item `B → ·γ` whose lookaheads are FIRST(β a) for every
/// a ∈ L; items with the same production and dot are merged by unioning
/// lookahead sets, and the whole set is iterated to a fixpoint.
pub fn closure(grammar: &Grammar, kernel: &[LrItem]) -> Vec<LrItem> {
    let mut items: Vec<LrItem> = kernel.to_vec();
    let mut positions: HashMap<(usize, usize), usize> = items
        .iter()
        .enumerate()
        .map(|(at, item)| ((item.production, item.dot), at))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        let mut index = 0;
        while index < items.len() {
            let driver = items[index].clone();
            let next = match driver.next_symbol(grammar) {
                Some(symbol @ Symbol::NonTerminal(_)) => symbol.clone(),
                _ => {
                    index += 1;
                    continue;
                }
            };

            let beta = driver.beta(grammar).to_vec();
            let beta_first = first_of_sentence(grammar, &beta);
            let beta_nullable = beta_first.contains(&Symbol::Epsilon);
            let mut lookaheads: BTreeSet<Symbol> = beta_first
                .into_iter()
                .filter(|s| !matches!(s, Symbol::Epsilon))
                .collect();
            if beta_nullable {
                lookaheads.extend(driver.lookaheads.iter().cloned());
            }

            for production in grammar.rules_for(&next) {
                match positions.get(&(production, 0)) {
                    Some(&at) => {
                        let target = &mut items[at];
                        let before = target.lookaheads.len();
                        target.lookaheads.extend(lookaheads.iter().cloned());
                        if target.lookaheads.len() != before {
                            changed = true;
                        }
                    }
                    None => {
                        positions.insert((production, 0), items.len());
                        items.push(LrItem::new(production, 0, lookaheads.clone()));
                        changed = true;
                    }
                }
            }
            index += 1;
        }
    }
    items
}

/// The kernel reached by shifting the dot over `symbol` in every applicable
/// closure item. Sorted so kernel equality is order-insensitive.
pub fn goto_kernel(grammar: &Grammar, closure_items: &[LrItem], symbol: &Symbol) -> Vec<LrItem> {
    let mut kernel: Vec<LrItem> = closure_items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(|item| LrItem::new(item.production, item.dot + 1, item.lookaheads.clone()))
        .collect();
    kernel.sort();
    kernel
}

/// Enumerate the LR(1) state set.
///
/// State 0's kernel is `{S′ → ·S, {$eoi}}`; states are numbered in discovery
/// order and goto symbols are processed in first-appearance order over the
/// closure, so the goto from state 0 on S is state 1.
pub fn build_automaton(grammar: &Grammar) -> LrAutomaton {
    debug_assert!(!grammar.contains_macro(), "the grammar must be macro-free");

    let mut eoi = BTreeSet::new();
    eoi.insert(Symbol::EndOfInput);
    let start_kernel = vec![LrItem::new(0, 0, eoi)];

    let mut states: Vec<LrState> = Vec::new();
    let mut known: HashMap<Vec<LrItem>, usize> = HashMap::new();
    let mut gotos: HashMap<(usize, Symbol), usize> = HashMap::new();

    known.insert(start_kernel.clone(), 0);
    states.push(LrState {
        closure: closure(grammar, &start_kernel),
        kernel: start_kernel,
    });

    let mut index = 0;
    while index < states.len() {
        let closure_items = states[index].closure.clone();

        let mut symbols: Vec<Symbol> = Vec::new();
        for item in &closure_items {
            if let Some(symbol) = item.next_symbol(grammar) {
                if !symbol.is_epsilon() && !symbols.contains(symbol) {
                    symbols.push(symbol.clone());
                }
            }
        }

        for symbol in symbols {
            let kernel = goto_kernel(grammar, &closure_items, &symbol);
            debug_assert!(!kernel.is_empty());
            let target = match known.get(&kernel) {
                Some(&id) => id,
                None => {
                    let id = states.len();
                    known.insert(kernel.clone(), id);
                    states.push(LrState {
                        closure: closure(grammar, &kernel),
                        kernel,
                    });
                    id
                }
            };
            gotos.insert((index, symbol), target);
        }
        index += 1;
    }

    LrAutomaton { states, gotos }
}
