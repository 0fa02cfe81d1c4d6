//! ACTION/GOTO table emission with conflict collection.

use super::{LrAction, LrAutomaton, LrTable};
use crate::error::LrConflict;
use crate::grammar::{Grammar, Symbol};
use std::collections::HashMap;

/// Emit the LR table for an augmented grammar and its automaton.
///
/// Per state: a shift for every terminal after a dot, a reduce (on each
/// lookahead) for every complete item, a goto for every non-terminal after a
/// dot, and the accept action in place of the `S′ → S` reduce on end of
/// input. Colliding actions are collected per cell across every state and
/// reported together; the builder never returns a partial table.
pub fn build_table(grammar: &Grammar, automaton: &LrAutomaton) -> Result<LrTable, Vec<LrConflict>> {
    let mut cells: Vec<HashMap<Symbol, Vec<LrAction>>> = Vec::with_capacity(automaton.states.len());

    for (id, state) in automaton.states.iter().enumerate() {
        let mut row: HashMap<Symbol, Vec<LrAction>> = HashMap::new();

        for item in &state.closure {
            match item.next_symbol(grammar) {
                Some(symbol @ Symbol::Terminal(_)) => {
                    let target = automaton.gotos[&(id, symbol.clone())];
                    propose(&mut row, symbol.clone(), LrAction::Shift(target));
                }
                Some(symbol @ Symbol::NonTerminal(_)) => {
                    let target = automaton.gotos[&(id, symbol.clone())];
                    propose(&mut row, symbol.clone(), LrAction::Goto(target));
                }
                Some(_) => {}
                None => {
                    for lookahead in &item.lookaheads {
                        let action = if item.production == 0
                            && lookahead.is_end_of_input()
                        {
                            LrAction::Accept
                        } else {
                            LrAction::Reduce(item.production)
                        };
                        propose(&mut row, lookahead.clone(), action);
                    }
                }
            }
        }
        cells.push(row);
    }

    let mut conflicts: Vec<LrConflict> = Vec::new();
    for (id, row) in cells.iter().enumerate() {
        let mut conflicted: Vec<(&Symbol, &Vec<LrAction>)> = row
            .iter()
            .filter(|(_, actions)| actions.len() > 1)
            .collect();
        conflicted.sort_by_key(|(symbol, _)| (*symbol).clone());
        for (symbol, actions) in conflicted {
            conflicts.push(LrConflict {
                state: id,
                symbol: symbol.clone(),
                actions: actions.clone(),
            });
        }
    }
    if !conflicts.is_empty() {
        return Err(conflicts);
    }

    let actions = cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(symbol, mut actions)| {
                    (symbol, actions.pop().expect("cell holds one action"))
                })
                .collect()
        })
        .collect();
    Ok(LrTable::new(actions))
}

fn propose(row: &mut HashMap<Symbol, Vec<LrAction>>, symbol: Symbol, action: LrAction) {
    let cell = row.entry(symbol).or_default();
    if !cell.contains(&action) {
        cell.push(action);
    }
}
