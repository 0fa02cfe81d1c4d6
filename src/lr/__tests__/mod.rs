use crate::grammar::{Grammar, ProductionRule, Sentence, Symbol};
use crate::lr::{build_automaton, build_table, first_of_sentence, LrAction};
use std::collections::BTreeSet;

fn rule(head: &str, body: Vec<Symbol>) -> ProductionRule {
    ProductionRule::new(Symbol::non_terminal(head), Sentence::new(body))
}

fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}

fn nt(name: &str) -> Symbol {
    Symbol::non_terminal(name)
}

/// s' → s ; s : a s | ε, augmented through Grammar::augment.
fn star_grammar() -> Grammar {
    let rules = vec![
        rule("s", vec![t("a"), nt("s")]),
        rule("s", vec![Symbol::Epsilon]),
    ];
    Grammar::new(nt("s"), rules).augment().unwrap()
}

#[test]
fn first_of_terminal_and_epsilon() {
    let grammar = star_grammar();
    let first = first_of_sentence(&grammar, &[t("a")]);
    assert_eq!(first, BTreeSet::from([t("a")]));

    let first = first_of_sentence(&grammar, &[Symbol::Epsilon]);
    assert_eq!(first, BTreeSet::from([Symbol::Epsilon]));
}

#[test]
fn first_of_nullable_non_terminal() {
    let grammar = star_grammar();
    // s is nullable, so FIRST(s b) = {a, b}.
    let first = first_of_sentence(&grammar, &[nt("s"), t("b")]);
    assert_eq!(first, BTreeSet::from([t("a"), t("b")]));

    let first = first_of_sentence(&grammar, &[nt("s")]);
    assert_eq!(first, BTreeSet::from([t("a"), Symbol::Epsilon]));
}

#[test]
fn first_guards_against_cycles() {
    // x : y a ; y : x ; mutually recursive, neither is nullable.
    let rules = vec![rule("x", vec![nt("y"), t("a")]), rule("y", vec![nt("x")])];
    let grammar = Grammar::new(nt("x"), rules).augment().unwrap();
    let first = first_of_sentence(&grammar, &[nt("x")]);
    assert!(!first.contains(&Symbol::Epsilon));
}

#[test]
fn state_zero_goto_on_start_is_state_one() {
    let grammar = star_grammar();
    let automaton = build_automaton(&grammar);
    assert_eq!(automaton.gotos[&(0, nt("s"))], 1);
}

#[test]
fn closure_expands_non_terminals_with_propagated_lookaheads() {
    let grammar = star_grammar();
    let automaton = build_automaton(&grammar);
    let state0 = &automaton.states[0];

    // Kernel s' → ·s plus both s rules.
    assert_eq!(state0.kernel.len(), 1);
    assert_eq!(state0.closure.len(), 3);
    // The expanded items carry the end-of-input lookahead of the driver.
    for item in &state0.closure[1..] {
        assert!(item.lookaheads.contains(&Symbol::EndOfInput));
    }
}

#[test]
fn accept_sits_in_state_one_on_end_of_input() {
    let grammar = star_grammar();
    let automaton = build_automaton(&grammar);
    let table = build_table(&grammar, &automaton).unwrap();
    assert_eq!(
        table.action(1, &Symbol::EndOfInput),
        Some(&LrAction::Accept)
    );
}

#[test]
fn epsilon_item_reduces_immediately() {
    let grammar = star_grammar();
    let automaton = build_automaton(&grammar);
    let table = build_table(&grammar, &automaton).unwrap();
    // In state 0 the ε rule of s must reduce on end of input.
    let index = grammar
        .rules()
        .iter()
        .position(|r| r.is_epsilon())
        .unwrap();
    assert_eq!(
        table.action(0, &Symbol::EndOfInput),
        Some(&LrAction::Reduce(index))
    );
}

#[test]
fn duplicate_rules_raise_one_reduce_reduce_conflict() {
    // s : a | a ; as two identical rules.
    let rules = vec![rule("s", vec![t("a")]), rule("s", vec![t("a")])];
    let grammar = Grammar::new(nt("s"), rules).augment().unwrap();
    let automaton = build_automaton(&grammar);
    let conflicts = build_table(&grammar, &automaton).unwrap_err();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].symbol, Symbol::EndOfInput);
    assert_eq!(conflicts[0].kind(), "reduce/reduce");
    assert_eq!(conflicts[0].actions.len(), 2);
}

#[test]
fn ambiguous_grammar_raises_shift_reduce_conflict() {
    // e : e + e | a ;
    let rules = vec![
        rule("e", vec![nt("e"), t("+"), nt("e")]),
        rule("e", vec![t("a")]),
    ];
    let grammar = Grammar::new(nt("e"), rules).augment().unwrap();
    let automaton = build_automaton(&grammar);
    let conflicts = build_table(&grammar, &automaton).unwrap_err();

    assert!(!conflicts.is_empty());
    assert!(conflicts.iter().any(|c| c.kind() == "reduce/shift"));
    assert!(conflicts.iter().all(|c| c.symbol == t("+")));
}

#[test]
fn every_conflict_is_collected_before_aborting() {
    // Two independent ambiguities must both be reported.
    let rules = vec![
        rule("s", vec![nt("x"), nt("y")]),
        rule("x", vec![t("a")]),
        rule("x", vec![t("a")]),
        rule("y", vec![t("b")]),
        rule("y", vec![t("b")]),
    ];
    let grammar = Grammar::new(nt("s"), rules).augment().unwrap();
    let automaton = build_automaton(&grammar);
    let conflicts = build_table(&grammar, &automaton).unwrap_err();
    assert_eq!(conflicts.len(), 2);
}

#[test]
fn optional_suffix_grammar_is_conflict_free() {
    // s : a | a b ; the reduce lookahead (end of input) and the shift
    // lookahead (b) land on different cells, so the canonical table builds.
    let rules = vec![rule("s", vec![t("a")]), rule("s", vec![t("a"), t("b")])];
    let grammar = Grammar::new(nt("s"), rules).augment().unwrap();
    let automaton = build_automaton(&grammar);
    let table = build_table(&grammar, &automaton).unwrap();

    // The state reached on a both shifts b and reduces on end of input.
    let after_a = automaton.gotos[&(0, t("a"))];
    assert!(matches!(
        table.action(after_a, &t("b")),
        Some(&LrAction::Shift(_))
    ));
    assert!(matches!(
        table.action(after_a, &Symbol::EndOfInput),
        Some(&LrAction::Reduce(_))
    ));
}

#[test]
fn at_most_one_action_per_cell() {
    let grammar = star_grammar();
    let automaton = build_automaton(&grammar);
    let table = build_table(&grammar, &automaton).unwrap();
    // Exhaustively probe every state and grammar symbol.
    let mut symbols: Vec<Symbol> = grammar.terminals().to_vec();
    symbols.extend(grammar.non_terminals().iter().cloned());
    symbols.push(Symbol::EndOfInput);
    for state in 0..table.state_count() {
        for symbol in &symbols {
            // A single lookup either hits one action or nothing; the builder
            // already refused multi-action cells.
            let _ = table.action(state, symbol);
        }
    }
}
