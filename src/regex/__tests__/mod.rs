use crate::error::RegexError;
use crate::regex::{parse_pattern, Charset, DerivativeCalculator, LexemeTag, RegexNode};
use std::collections::HashMap;
use std::rc::Rc;

fn ascii() -> Rc<Charset> {
    Rc::new(Charset::ascii())
}

fn parse(pattern: &str) -> Rc<RegexNode> {
    parse_pattern(pattern, &ascii(), &HashMap::new()).unwrap()
}

/// Whether the pattern matches the whole text, by repeated derivation.
fn matches(pattern: &Rc<RegexNode>, text: &str) -> bool {
    let mut calculator = DerivativeCalculator::new();
    let mut current = Rc::clone(pattern);
    for c in text.chars() {
        current = calculator.derive(&current, c);
        if current.is_empty_set() {
            return false;
        }
    }
    current.contains_epsilon()
}

#[test]
fn contains_epsilon_follows_the_variant_table() {
    assert!(RegexNode::epsilon().contains_epsilon());
    assert!(!RegexNode::empty_set().contains_epsilon());
    assert!(!RegexNode::literal('a').contains_epsilon());
    assert!(RegexNode::star(RegexNode::literal('a')).contains_epsilon());
    assert!(RegexNode::union(RegexNode::literal('a'), RegexNode::epsilon()).contains_epsilon());
    assert!(!RegexNode::union(RegexNode::literal('a'), RegexNode::literal('b')).contains_epsilon());
    assert!(!RegexNode::concat(RegexNode::epsilon(), RegexNode::literal('b')).contains_epsilon());
    assert!(RegexNode::concat(RegexNode::epsilon(), RegexNode::epsilon()).contains_epsilon());
    assert!(!RegexNode::anything(ascii()).contains_epsilon());
}

#[test]
fn derivative_of_literal() {
    let mut calculator = DerivativeCalculator::new();
    let a = RegexNode::literal('a');
    assert!(calculator.derive(&a, 'a').is_epsilon());
    assert!(calculator.derive(&a, 'b').is_empty_set());
}

#[test]
fn derivative_of_concat_with_nullable_head() {
    // ∂_b (a? b) must reach ε through the nullable head.
    let pattern = parse("a?b");
    let mut calculator = DerivativeCalculator::new();
    let d = calculator.derive(&pattern, 'b');
    assert!(d.contains_epsilon());
}

#[test]
fn epsilon_union_branch_is_preserved() {
    // ∂_a (a|ab*) = ε|b*; collapsing the ε side would drop the short accept.
    let pattern = parse("a|ab*");
    let mut calculator = DerivativeCalculator::new();
    let d = calculator.derive(&pattern, 'a');
    assert!(d.contains_epsilon());
    // The b* branch must still be alive after the short accept point.
    let db = calculator.derive(&d, 'b');
    assert!(db.contains_epsilon());
}

#[test]
fn simplification_is_idempotent() {
    let mut calculator = DerivativeCalculator::new();
    let pattern = RegexNode::union(
        RegexNode::concat(RegexNode::epsilon(), RegexNode::literal('a')),
        RegexNode::empty_set(),
    );
    let once = calculator.simplify(&pattern);
    let twice = calculator.simplify(&once);
    assert_eq!(once, twice);
    assert_eq!(once, RegexNode::literal('a'));
}

#[test]
fn simplification_rules() {
    let mut calculator = DerivativeCalculator::new();
    let a = RegexNode::literal('a');

    let star_star = RegexNode::star(RegexNode::star(Rc::clone(&a)));
    assert_eq!(
        calculator.simplify(&star_star),
        RegexNode::star(Rc::clone(&a))
    );

    let star_empty = RegexNode::star(RegexNode::empty_set());
    assert!(calculator.simplify(&star_empty).is_epsilon());

    let same = RegexNode::union(Rc::clone(&a), Rc::clone(&a));
    assert_eq!(calculator.simplify(&same), a);
}

#[test]
fn derivation_twice_is_well_defined() {
    let pattern = parse("(ab|ac)*");
    let mut calculator = DerivativeCalculator::new();
    let d1 = calculator.derive(&pattern, 'a');
    let d2 = calculator.derive(&d1, 'b');
    assert!(d2.contains_epsilon());
    let d3 = calculator.derive(&d2, 'a');
    assert!(!d3.is_empty_set());
}

#[test]
fn tag_survives_derivation() {
    let tag = Rc::new(LexemeTag {
        name: Rc::from("number"),
        order: 0,
        is_ignored: false,
    });
    let pattern = parse("[0-9]+").tag_deep(&tag);
    let mut calculator = DerivativeCalculator::new();
    let d = calculator.derive(&pattern, '7');
    assert!(d.contains_epsilon());
    assert_eq!(d.tag().map(|t| t.name.as_ref()), Some("number"));
}

#[test]
fn structural_equality_ignores_tags() {
    let tag = Rc::new(LexemeTag {
        name: Rc::from("x"),
        order: 0,
        is_ignored: false,
    });
    let plain = parse("ab");
    let tagged = plain.tag_deep(&tag);
    assert_eq!(plain, tagged);
    assert_ne!(plain.state_key(), tagged.state_key());
}

#[test]
fn pattern_matching_agrees_with_the_regex_crate() {
    let samples = [
        ("[0-9]+", vec!["7", "42", "007", "", "4a", "a"]),
        ("a|ab*", vec!["a", "ab", "abbb", "b", "aab"]),
        ("(ab)+c?", vec!["ab", "abab", "abc", "ababc", "ac", ""]),
        ("[a-z_][a-z0-9_]*", vec!["x", "_tmp", "a9", "9a", ""]),
    ];
    for (pattern, inputs) in samples {
        let ours = parse(pattern);
        let oracle = regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap();
        for input in inputs {
            assert_eq!(
                matches(&ours, input),
                oracle.is_match(input),
                "pattern {:?} on input {:?}",
                pattern,
                input
            );
        }
    }
}

#[test]
fn class_negation_respects_the_charset() {
    let pattern = parse("[^abc]");
    assert!(matches(&pattern, "d"));
    assert!(!matches(&pattern, "a"));
    // Outside the ascii charset nothing matches a negated class.
    assert!(!matches(&pattern, "é"));
}

#[test]
fn alphabet_of_a_pattern() {
    let pattern = parse("a[0-1]z?");
    let alphabet = pattern.alphabet(&['\0']);
    let expected: Vec<char> = vec!['\0', '0', '1', 'a', 'z'];
    assert_eq!(alphabet.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn char_range_folds_into_a_union() {
    let range = RegexNode::char_range('a', 'c');
    assert!(matches(&range, "a"));
    assert!(matches(&range, "b"));
    assert!(matches(&range, "c"));
    assert!(!matches(&range, "d"));
    assert!(!matches(&range, "ab"));
}

#[test]
fn malformed_patterns_are_rejected() {
    let fragments = HashMap::new();
    for pattern in ["", "(", "a)", "*a", "a|", "[", "[]", "a\\"] {
        assert!(
            parse_pattern(pattern, &ascii(), &fragments).is_err(),
            "pattern {:?} should be rejected",
            pattern
        );
    }
}

#[test]
fn empty_range_is_rejected() {
    let err = parse_pattern("[z-a]", &ascii(), &HashMap::new()).unwrap_err();
    assert_eq!(
        err,
        RegexError::EmptyRange {
            from: 'z',
            to: 'a'
        }
    );
}

#[test]
fn fragments_are_resolved() {
    let mut fragments: HashMap<Rc<str>, Rc<RegexNode>> = HashMap::new();
    fragments.insert(Rc::from("digit"), parse("[0-9]"));
    let pattern = parse_pattern("{digit}+", &ascii(), &fragments).unwrap();
    assert!(matches(&pattern, "123"));
    assert!(!matches(&pattern, ""));

    let err = parse_pattern("{nope}", &ascii(), &fragments).unwrap_err();
    assert_eq!(
        err,
        RegexError::UnknownFragment {
            name: "nope".to_string()
        }
    );
}

#[test]
fn derivation_history_is_recorded_and_resettable() {
    let pattern = parse("ab");
    let mut calculator = DerivativeCalculator::new();
    calculator.derive(&pattern, 'a');
    assert!(!calculator.history().is_empty());
    calculator.reset_history();
    assert!(calculator.history().is_empty());
}
