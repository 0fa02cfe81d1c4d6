use crate::error::{BuildError, GrammarError, TokenizeError};
use crate::regex::{parse_pattern, Charset, Lexeme, RegexNode};
use crate::tokenizer::{DfaBuilder, TokenStream, Tokenizer};
use crate::util::Code;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

fn lexeme(name: &str, pattern: &str, is_ignored: bool) -> Lexeme {
    let charset = Rc::new(Charset::ascii());
    let node = parse_pattern(pattern, &charset, &HashMap::new()).unwrap();
    Lexeme::new(name, node, is_ignored, charset)
}

fn tokenizer(lexemes: Vec<Lexeme>, ignored_chars: &[char]) -> Tokenizer {
    let table = DfaBuilder::new(lexemes, ignored_chars).build_table().unwrap();
    Tokenizer::new(table)
}

#[test]
fn dfa_states_are_unique_and_never_sink() {
    let mut builder = DfaBuilder::new(
        vec![lexeme("int", "[0-9]+", false), lexeme("id", "[a-z]+", false)],
        &[],
    );
    let dfa = builder.build_dfa().unwrap();

    let mut names: Vec<&str> = dfa.states.iter().map(|s| s.name.as_str()).collect();
    names.sort();
    let before = names.len();
    names.dedup();
    assert_eq!(before, names.len(), "duplicate canonical state");

    for state in &dfa.states {
        assert!(!state.regex.is_empty_set());
        for &(_, target) in &state.transitions {
            assert!(!dfa.states[target].regex.is_empty_set());
        }
    }
}

#[test]
fn tokens_partition_the_input() {
    let t = tokenizer(
        vec![lexeme("int", "[0-9]+", false), lexeme("op", "[+*]", false)],
        &[' '],
    );
    let source = "12+3 * 45";
    let code = Code::from(source);
    let tokens = t.tokenize(&code).unwrap();

    let chars: Vec<char> = source.chars().collect();
    let mut previous_end = 0;
    for token in &tokens {
        assert!(token.start < token.end && token.end <= chars.len());
        assert!(token.start >= previous_end);
        let expected: String = chars[token.start..token.end].iter().collect();
        assert_eq!(token.value, expected);
        previous_end = token.end;
    }
    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["12", "+", "3", "*", "45"]);
}

#[test]
fn longest_match_wins() {
    // Declaration order is the tie-break only on equal length.
    let t = tokenizer(
        vec![lexeme("if", "if", false), lexeme("id", "[a-zA-Z]+", false)],
        &[],
    );
    let code = Code::from("ifx");
    let tokens = t.tokenize(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type.as_ref(), "id");
    assert_eq!(tokens[0].value, "ifx");
}

#[test]
fn first_declared_lexeme_wins_on_tie() {
    let t = tokenizer(
        vec![lexeme("kw", "if", false), lexeme("id", "if", false)],
        &[],
    );
    let code = Code::from("if");
    let tokens = t.tokenize(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type.as_ref(), "kw");
}

#[test]
fn ignored_characters_are_skipped_without_emission() {
    let t = tokenizer(vec![lexeme("int", "[0-9]+", false)], &[' ', '\t']);
    let code = Code::from("  1 \t 2  ");
    let tokens = t.tokenize(&code).unwrap();
    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["1", "2"]);
    assert_eq!(tokens[0].start, 2);
    assert_eq!(tokens[1].start, 5);
}

#[test]
fn line_and_column_bookkeeping() {
    let t = tokenizer(vec![lexeme("int", "[0-9]+", false)], &[' ', '\n']);
    let code = Code::from("1\n 23\n4");
    let tokens = t.tokenize(&code).unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (2, 2));
    assert_eq!((tokens[2].line, tokens[2].column), (3, 1));
}

#[test]
fn empty_input_yields_no_tokens() {
    let t = tokenizer(vec![lexeme("int", "[0-9]+", false)], &[' ']);
    let tokens = t.tokenize(&Code::from("")).unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn unexpected_character_location() {
    let t = tokenizer(
        vec![lexeme("int", "[0-9]+", false), lexeme("comma", ",", false)],
        &[' '],
    );
    let err = t.tokenize(&Code::from("1,@2")).unwrap_err();
    match err {
        TokenizeError::UnexpectedCharacter {
            character,
            position,
            line,
            column,
            ..
        } => {
            assert_eq!(character, '@');
            assert_eq!(position, 2);
            assert_eq!((line, column), (1, 3));
        }
        other => panic!("expected UnexpectedCharacter, found {:?}", other),
    }
}

#[test]
fn unexpected_end_of_input_mid_token() {
    let t = tokenizer(vec![lexeme("str", "'[a-z]*'", false)], &[]);
    let err = t.tokenize(&Code::from("'abc")).unwrap_err();
    assert!(matches!(err, TokenizeError::UnexpectedEndOfInput { .. }));
}

#[test]
fn ignored_lexemes_are_emitted_then_filtered() {
    let t = tokenizer(
        vec![lexeme("ws", " +", true), lexeme("int", "[0-9]+", false)],
        &[],
    );
    let code = Code::from("1 2");
    let tokens = t.tokenize(&code).unwrap();
    // The whitespace token is still emitted by the automaton.
    assert_eq!(tokens.len(), 3);

    let stream = TokenStream::new(&tokens, t.ignored());
    assert_eq!(stream.len(), 2);
    assert_eq!(stream.token_at(0).unwrap().value, "1");
    assert_eq!(stream.token_at(1).unwrap().value, "2");
    assert_eq!(stream.previous_end(1), 1);
}

#[test]
fn duplicate_lexeme_names_are_rejected_with_occurrences() {
    let mut builder = DfaBuilder::new(
        vec![
            lexeme("x", "a", false),
            lexeme("y", "b", false),
            lexeme("x", "c", false),
        ],
        &[],
    );
    let errors = builder.build_dfa().unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        BuildError::Grammar(GrammarError::DuplicateLexeme { name, occurrences }) => {
            assert_eq!(name, "x");
            assert_eq!(occurrences, &vec![0, 2]);
        }
        other => panic!("expected DuplicateLexeme, found {:?}", other),
    }
}

#[test]
fn nullable_lexeme_is_rejected() {
    let mut builder = DfaBuilder::new(vec![lexeme("ws", " *", true)], &[]);
    let errors = builder.build_dfa().unwrap_err();
    assert!(matches!(
        errors[0],
        BuildError::Grammar(GrammarError::NullableLexeme { .. })
    ));
}

#[test]
fn round_trip_concatenation_restores_the_input() {
    let t = tokenizer(
        vec![lexeme("word", "[a-z]+", false), lexeme("int", "[0-9]+", false)],
        &[' '],
    );
    let source = "abc 12 de 3";
    let tokens = t.tokenize(&Code::from(source)).unwrap();
    let joined: String = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(joined, source.replace(' ', ""));
}

#[test]
fn tokenization_agrees_with_a_regex_scanner() {
    // Oracle: a regex-crate scanner applying the same longest-match rule.
    let specs = [("int", "[0-9]+"), ("id", "[a-z]+"), ("op", "[+*=-]")];
    let t = tokenizer(
        specs
            .iter()
            .map(|(name, pattern)| lexeme(name, pattern, false))
            .collect(),
        &[' '],
    );
    let oracle: Vec<(usize, regex::Regex)> = specs
        .iter()
        .enumerate()
        .map(|(i, (_, p))| (i, regex::Regex::new(&format!("^(?:{})", p)).unwrap()))
        .collect();

    let source = "x1 = abc+42*z";
    let tokens = t.tokenize(&Code::from(source)).unwrap();

    let mut expected: Vec<(usize, String)> = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut at = 0;
    while at < chars.len() {
        if chars[at] == ' ' {
            at += 1;
            continue;
        }
        let rest: String = chars[at..].iter().collect();
        let (index, text) = oracle
            .iter()
            .filter_map(|(i, re)| re.find(&rest).map(|m| (*i, m.as_str().to_string())))
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then(b.0.cmp(&a.0)))
            .unwrap();
        at += text.chars().count();
        expected.push((index, text));
    }

    assert_eq!(tokens.len(), expected.len());
    for (token, (index, text)) in tokens.iter().zip(&expected) {
        assert_eq!(token.token_type.as_ref(), specs[*index].0);
        assert_eq!(&token.value, text);
    }
}
