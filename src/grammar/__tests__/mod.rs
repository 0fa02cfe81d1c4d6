use crate::grammar::{Grammar, MacroSymbol, ProductionRule, Sentence, Symbol};

fn list_grammar() -> Grammar {
    // list : item ("," item)* ;
    let item = Symbol::terminal("item");
    let comma = Symbol::terminal(",");
    let tail = Symbol::zero_or_more(Symbol::grouping(vec![comma, item.clone()]));
    let rule = ProductionRule::new(
        Symbol::non_terminal("list"),
        Sentence::new(vec![item, tail]),
    );
    Grammar::new(Symbol::non_terminal("list"), vec![rule])
}

#[test]
fn sentence_flattens_pipes_into_one_alternative() {
    let a = Symbol::terminal("a");
    let b = Symbol::terminal("b");
    let sentence = Sentence::new(vec![
        a.clone(),
        Symbol::pipe(),
        a.clone(),
        b.clone(),
    ]);

    assert_eq!(sentence.len(), 1);
    match &sentence.symbols()[0] {
        Symbol::Macro(MacroSymbol::Alternative(segments)) => {
            assert_eq!(segments.len(), 2);
            assert_eq!(segments[0], Sentence::new(vec![a.clone()]));
            assert_eq!(segments[1], Sentence::new(vec![a, b]));
        }
        other => panic!("expected an alternative macro, found {:?}", other),
    }
}

#[test]
fn empty_pipe_segment_becomes_epsilon_sentence() {
    let a = Symbol::terminal("a");
    let sentence = Sentence::new(vec![a, Symbol::pipe()]);
    match &sentence.symbols()[0] {
        Symbol::Macro(MacroSymbol::Alternative(segments)) => {
            assert!(segments[1].is_epsilon());
        }
        other => panic!("expected an alternative macro, found {:?}", other),
    }
}

#[test]
fn expansion_removes_every_macro() {
    let grammar = list_grammar();
    assert!(grammar.contains_macro());
    let expanded = grammar.expand_macros();
    assert!(!expanded.contains_macro());
}

#[test]
fn zero_or_more_expands_to_right_recursion() {
    let expanded = list_grammar().expand_macros();
    let bnf = expanded.to_bnf();

    // list : item M_0_1 ;  M_0_0 : "," item ;  M_0_1 : M_0_0 M_0_1 | ε ;
    assert_eq!(
        bnf,
        "list : \"item\" M_0_1 ;\nM_0_0 : \",\" \"item\" ;\nM_0_1 : M_0_0 M_0_1 ;\nM_0_1 : ε ;\n"
    );
}

#[test]
fn one_or_more_and_nullable_expansion_shapes() {
    // seq : item+ tail? ;
    let item = Symbol::terminal("item");
    let tail = Symbol::terminal("tail");
    let rule = ProductionRule::new(
        Symbol::non_terminal("seq"),
        Sentence::new(vec![
            Symbol::one_or_more(item),
            Symbol::nullable(tail),
        ]),
    );
    let grammar = Grammar::new(Symbol::non_terminal("seq"), vec![rule]);
    let bnf = grammar.expand_macros().to_bnf();

    assert_eq!(
        bnf,
        "seq : M_0_0 M_0_1 ;\n\
         M_0_0 : \"item\" M_0_0 ;\n\
         M_0_0 : \"item\" ;\n\
         M_0_1 : \"tail\" ;\n\
         M_0_1 : ε ;\n"
    );
}

#[test]
fn alternative_expands_to_one_rule_per_branch() {
    // s : a | a b ;
    let a = Symbol::terminal("a");
    let b = Symbol::terminal("b");
    let rule = ProductionRule::new(
        Symbol::non_terminal("s"),
        Sentence::new(vec![a.clone(), Symbol::pipe(), a, b]),
    );
    let grammar = Grammar::new(Symbol::non_terminal("s"), vec![rule]);
    let bnf = grammar.expand_macros().to_bnf();

    assert_eq!(bnf, "s : M_0_0 ;\nM_0_0 : \"a\" ;\nM_0_0 : \"a\" \"b\" ;\n");
}

#[test]
fn expansion_is_deterministic() {
    let first = list_grammar().expand_macros().to_bnf();
    let second = list_grammar().expand_macros().to_bnf();
    assert_eq!(first, second);
}

#[test]
fn augmentation_prepends_fresh_start_rule() {
    let expanded = list_grammar().expand_macros();
    let augmented = expanded.augment().unwrap();

    assert_eq!(augmented.start().name().unwrap().as_ref(), "list'");
    assert_eq!(augmented.rules()[0].head(), augmented.start());
    assert_eq!(
        augmented.rules()[0].body(),
        &Sentence::new(vec![Symbol::non_terminal("list")])
    );
    assert_eq!(augmented.rules().len(), expanded.rules().len() + 1);
}

#[test]
fn augmentation_reports_every_undefined_non_terminal() {
    let rule = ProductionRule::new(
        Symbol::non_terminal("s"),
        Sentence::new(vec![
            Symbol::non_terminal("missing_a"),
            Symbol::non_terminal("missing_b"),
        ]),
    );
    let grammar = Grammar::new(Symbol::non_terminal("s"), vec![rule]);
    let errors = grammar.augment().unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn duplicate_rules_are_preserved_in_order() {
    let a = Symbol::terminal("a");
    let rule = ProductionRule::new(Symbol::non_terminal("s"), Sentence::new(vec![a.clone()]));
    let grammar = Grammar::new(Symbol::non_terminal("s"), vec![rule.clone(), rule.clone()]);
    assert_eq!(grammar.rules().len(), 2);
    assert_eq!(grammar.rules()[0], grammar.rules()[1]);
}

#[test]
fn grammar_membership() {
    let grammar = list_grammar();
    assert!(grammar.contains(&Symbol::non_terminal("list")));
    assert!(grammar.contains(&Symbol::terminal("item")));
    assert!(!grammar.contains(&Symbol::terminal("nope")));
    assert!(!grammar.contains(&Symbol::Epsilon));
}
