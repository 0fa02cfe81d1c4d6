use crate::examples::config::config_language;
use crate::MetaParser;

const SAMPLE: &str = r##"
# server settings
[server]
host = "localhost"
port = 8080
verbose = true

[limits]
retries = -3
"##;

#[test]
fn parses_sections_and_assignments() {
    let language = config_language(&MetaParser::new());
    let tree = language.parse(SAMPLE).unwrap();

    assert_eq!(tree.name().as_ref(), "config");
    assert_eq!(tree.find_all("section").len(), 2);
    assert_eq!(tree.find_all("assignment").len(), 4);
}

#[test]
fn comments_are_tokenized_but_dropped() {
    let language = config_language(&MetaParser::new());
    let tokens = language.tokenize(SAMPLE).unwrap();
    assert!(tokens
        .iter()
        .any(|t| t.token_type.as_ref() == "comment"));

    let tree = language.parse(SAMPLE).unwrap();
    assert!(tree
        .leaves()
        .iter()
        .all(|t| t.token_type.as_ref() != "comment"));
}

#[test]
fn fragments_compose_the_key_lexeme() {
    let language = config_language(&MetaParser::new());
    assert!(language.parse("k1 = 2").is_ok());
    // A key cannot start with a digit.
    assert!(language.parse("1k = 2").is_err());
}

#[test]
fn description_lists_lexemes_and_rules() {
    let language = config_language(&MetaParser::new());
    let description = language.description();
    assert!(description.contains("key"));
    assert!(description.contains("(ignored)"));
    assert!(description.contains("config :"));
}
