use crate::error::{BuildError, GrammarError};
use crate::gdef::MetaParser;
use crate::Language;

fn meta() -> MetaParser {
    MetaParser::new()
}

#[test]
fn meta_grammar_parses_a_minimal_definition() {
    let tree = meta()
        .parse(
            r#"
            lexeme int = "[0-9]+";
            start : $int ;
            "#,
        )
        .unwrap();

    assert_eq!(tree.name().as_ref(), "grammar");
    assert!(tree.contains("lexeme_decl"));
    assert!(tree.contains("production"));
}

#[test]
fn definition_compiles_and_parses_input() {
    let language = Language::compile(
        &meta(),
        r#"
        ignored-chars = " \t";
        lexeme int = "[0-9]+";
        list : $int ("," $int)* ;
        "#,
    )
    .unwrap();

    let tokens = language.tokenize("1, 22,3").unwrap();
    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["1", ",", "22", ",", "3"]);

    let tree = language.parse("1, 22,3").unwrap();
    assert_eq!(tree.name().as_ref(), "list");
    assert_eq!(tree.leaves().len(), 5);
}

#[test]
fn keywords_are_harvested_from_production_bodies() {
    let language = Language::compile(
        &meta(),
        r#"
        lexeme id = "[a-z]+";
        decl : "let" $id ";" ;
        "#,
    )
    .unwrap();

    // "let" must tokenize as the keyword, not as an id, on the length tie.
    let tokens = language.tokenize("let x;").unwrap();
    assert_eq!(tokens[0].token_type.as_ref(), "let");
    assert_eq!(tokens[1].token_type.as_ref(), "id");
    assert_eq!(tokens[2].token_type.as_ref(), ";");
}

#[test]
fn pipes_flatten_into_alternatives() {
    let language = Language::compile(
        &meta(),
        r#"
        lexeme int = "[0-9]+";
        lexeme name = "[a-z]+";
        value : $int | $name ;
        "#,
    )
    .unwrap();

    assert!(language.parse("42").is_ok());
    assert!(language.parse("abc").is_ok());
    assert!(language.parse("4a").is_err());
}

#[test]
fn fragments_substitute_into_later_patterns() {
    let language = Language::compile(
        &meta(),
        r#"
        fragment digit = "[0-9]";
        lexeme number = "{digit}+(\\.{digit}+)?";
        num : $number ;
        "#,
    )
    .unwrap();

    assert!(language.parse("3.14").is_ok());
    assert!(language.parse("3.").is_err());
}

#[test]
fn ignore_annotation_drops_tokens_from_the_parse() {
    let language = Language::compile(
        &meta(),
        r#"
        [ignore: true] lexeme ws = "( |\t)+";
        lexeme int = "[0-9]+";
        pair : $int $int ;
        "#,
    )
    .unwrap();

    // The whitespace token is emitted but invisible to the parser.
    let tokens = language.tokenize("1 2").unwrap();
    assert_eq!(tokens.len(), 3);
    let tree = language.parse("1 2").unwrap();
    assert_eq!(tree.leaves().len(), 2);
}

#[test]
fn charset_annotation_is_resolved() {
    let language = Language::compile(
        &meta(),
        r#"
        [charset: "extended ascii"] lexeme word = "[a-z]+";
        w : $word ;
        "#,
    )
    .unwrap();
    assert!(language.parse("abc").is_ok());
}

#[test]
fn unknown_charset_is_a_build_error() {
    let errors = Language::compile(
        &meta(),
        r#"
        [charset: "klingon"] lexeme word = "[a-z]+";
        w : $word ;
        "#,
    )
    .unwrap_err();
    assert!(matches!(
        errors[0],
        BuildError::Grammar(GrammarError::UnknownCharset { .. })
    ));
}

#[test]
fn duplicate_lexemes_and_undefined_references_aggregate() {
    let errors = Language::compile(
        &meta(),
        r#"
        lexeme int = "[0-9]+";
        lexeme int = "[0-9]";
        start : $int missing ;
        "#,
    )
    .unwrap_err();

    assert!(errors.iter().any(|e| matches!(
        e,
        BuildError::Grammar(GrammarError::DuplicateLexeme { .. })
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        BuildError::Grammar(GrammarError::UndefinedNonTerminal { .. })
    )));
}

#[test]
fn placeholder_action_is_parsed_but_produces_nothing() {
    let tree = meta()
        .parse(
            r#"
            lexeme int = "[0-9]+";
            start : $int => placeholder ;
            "#,
        )
        .unwrap();
    assert!(tree.contains("action_decl"));

    let language = Language::compile(
        &meta(),
        r#"
        lexeme int = "[0-9]+";
        start : $int => placeholder ;
        "#,
    )
    .unwrap();
    let parsed = language.parse("7").unwrap();
    assert_eq!(parsed.leaves().len(), 1);
}

#[test]
fn syntax_error_in_the_definition_is_reported_with_position() {
    let errors = Language::compile(&meta(), "lexeme = ;").unwrap_err();
    assert!(matches!(
        errors[0],
        BuildError::Grammar(GrammarError::MalformedDefinition { .. })
    ));
}

#[test]
fn unterminated_string_fails_at_end_of_input() {
    let errors = Language::compile(&meta(), r#"lexeme a = "unterminated"#).unwrap_err();
    match &errors[0] {
        BuildError::Grammar(GrammarError::MalformedDefinition { message, .. }) => {
            assert!(message.contains("UnexpectedEndOfInput"), "{}", message);
        }
        other => panic!("expected MalformedDefinition, found {:?}", other),
    }
}

#[test]
fn reserved_keyword_cannot_head_a_production() {
    let errors = Language::compile(
        &meta(),
        r#"
        lexeme int = "[0-9]+";
        lexeme x = "x";
        charso : $int ;
        ignore : $x ;
        "#,
    );
    // "ignore" is reserved and tokenizes as a keyword, so the definition
    // fails to parse.
    assert!(errors.is_err());
}

#[test]
fn conflicting_definition_reports_lr_conflicts() {
    let errors = Language::compile(
        &meta(),
        r#"
        lexeme a = "a";
        s : $a | $a ;
        "#,
    )
    .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].exit_code(), 2);
    match &errors[0] {
        BuildError::Conflict(conflict) => {
            assert_eq!(conflict.kind(), "reduce/reduce");
        }
        other => panic!("expected a conflict, found {:?}", other),
    }
}

#[test]
fn meta_parser_round_trips_its_own_surface_description() {
    // The meta grammar parses a definition shaped like its own EBNF subset.
    let definition = r#"
        ignored-chars = " \n";
        lexeme id = "[a-z_]+";
        lexeme string = "\"([^\"\\\\]|\\\\.)*\"";
        grammar : production+ ;
        production : $id ":" symbol+ ";" ;
        symbol : $string | $id | "(" symbol+ ")" | symbol "?" | "|" ;
        "#;
    let language = Language::compile(&meta(), definition).unwrap();
    let parsed = language
        .parse(r#"list : item ("," item)? ; item : value ;"#)
        .unwrap();
    assert_eq!(parsed.name().as_ref(), "grammar");
}
