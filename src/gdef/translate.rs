//! Walks the reduced meta-CST and produces the user's lexemes, ignored
//! characters and production rules.

use super::meta::KEYWORDS;
use crate::error::{BuildError, GrammarError};
use crate::grammar::{self, ProductionRule, Sentence, Symbol};
use crate::parser::CstNode;
use crate::regex::{parse_pattern, Charset, Lexeme, RegexNode};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Everything a definition declares, ready for table construction. Keyword
/// lexemes harvested from production bodies are listed before the user's
/// lexeme declarations so keywords win priority ties.
pub(crate) struct Definition {
    pub lexemes: Vec<Lexeme>,
    pub ignored_chars: Vec<char>,
    pub rules: Vec<ProductionRule>,
    pub start: Symbol,
}

pub(crate) fn translate(tree: &CstNode) -> Result<Definition, Vec<BuildError>> {
    let mut errors: Vec<BuildError> = Vec::new();
    let mut lexemes: Vec<Lexeme> = Vec::new();
    let mut fragments: HashMap<Rc<str>, Rc<RegexNode>> = HashMap::new();
    let mut ignored_chars: Vec<char> = Vec::new();
    let mut rules: Vec<ProductionRule> = Vec::new();
    let mut keywords: Vec<Rc<str>> = Vec::new();
    let mut keyword_seen: HashSet<Rc<str>> = HashSet::new();

    for child in tree.children() {
        // A setting wrapper holds exactly one declaration.
        let node = if child.name().as_ref() == "setting" {
            &child.children()[0]
        } else {
            child
        };
        match node.name().as_ref() {
            "lexeme_decl" => {
                if let Some(lexeme) = translate_lexeme(node, &fragments, &mut errors) {
                    lexemes.push(lexeme);
                }
            }
            "fragment_decl" => {
                let name = leaf_value(node, "id");
                let pattern = unescape_string(&leaf_value(node, "string"));
                match parse_pattern(&pattern, &Rc::new(Charset::ascii()), &fragments) {
                    Ok(regex) => {
                        fragments.insert(Rc::from(name.as_str()), regex);
                    }
                    Err(err) => errors.push(err.into()),
                }
            }
            "ignored_decl" => {
                let value = unescape_string(&leaf_value(node, "string"));
                ignored_chars.extend(value.chars());
            }
            "production" => {
                translate_production(node, &mut rules, &mut keywords, &mut keyword_seen, &mut errors);
            }
            _ => {}
        }
    }

    if rules.is_empty() {
        errors.push(GrammarError::EmptyGrammar.into());
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let charset = Rc::new(Charset::ascii());
    let mut all_lexemes: Vec<Lexeme> = keywords
        .iter()
        .map(|keyword| {
            Lexeme::new(
                keyword,
                RegexNode::literal_sequence(keyword),
                false,
                Rc::clone(&charset),
            )
        })
        .collect();
    all_lexemes.append(&mut lexemes);

    let start = rules[0].head().clone();
    Ok(Definition {
        lexemes: all_lexemes,
        ignored_chars,
        rules,
        start,
    })
}

fn translate_lexeme(
    node: &CstNode,
    fragments: &HashMap<Rc<str>, Rc<RegexNode>>,
    errors: &mut Vec<BuildError>,
) -> Option<Lexeme> {
    let name = leaf_value(node, "id");
    if let Err(err) = grammar::validate_name(&name) {
        errors.push(err.into());
        return None;
    }

    let mut charset = Charset::ascii();
    let mut is_ignored = false;
    if let Some(annotations) = node
        .children()
        .iter()
        .find(|child| child.name().as_ref() == "annotations")
    {
        for annotation in annotations.find_all("annotation") {
            let key = annotation.children()[0].name();
            match key.as_ref() {
                "charset" => {
                    let value = unescape_string(&leaf_value(annotation, "string"));
                    match Charset::from_name(&value) {
                        Ok(resolved) => charset = resolved,
                        Err(err) => errors.push(err.into()),
                    }
                }
                "ignore" => {
                    let flag = annotation
                        .find("bool_value")
                        .expect("the ignore annotation carries a boolean");
                    is_ignored = flag.children()[0].name().as_ref() == "true";
                }
                other => {
                    // Unreachable through the meta grammar, kept as a guard
                    // for hand-built trees.
                    errors.push(
                        GrammarError::UnknownAnnotation {
                            key: other.to_string(),
                            value: String::new(),
                        }
                        .into(),
                    );
                }
            }
        }
    }

    let pattern_text = unescape_string(&leaf_value(node, "string"));
    match parse_pattern(&pattern_text, &Rc::new(charset.clone()), fragments) {
        Ok(pattern) => Some(Lexeme::new(&name, pattern, is_ignored, Rc::new(charset))),
        Err(err) => {
            errors.push(err.into());
            None
        }
    }
}

fn translate_production(
    node: &CstNode,
    rules: &mut Vec<ProductionRule>,
    keywords: &mut Vec<Rc<str>>,
    keyword_seen: &mut HashSet<Rc<str>>,
    errors: &mut Vec<BuildError>,
) {
    let head_name = leaf_value(node, "id");
    if let Err(err) = grammar::validate_name(&head_name) {
        errors.push(err.into());
        return;
    }
    if KEYWORDS.contains(&head_name.as_str()) {
        errors.push(
            GrammarError::InvalidName {
                name: head_name,
                reason: "reserved keyword",
            }
            .into(),
        );
        return;
    }

    let mut body: Vec<Symbol> = Vec::new();
    for child in node.children() {
        if child.name().as_ref() == "symbol" {
            match translate_symbol(child, keywords, keyword_seen) {
                Ok(symbol) => body.push(symbol),
                Err(err) => errors.push(err),
            }
        }
        // An action_decl is parsed and preserved in the CST but produces no
        // translator output.
    }
    rules.push(ProductionRule::new(
        Symbol::non_terminal(&head_name),
        Sentence::new(body),
    ));
}

fn translate_symbol(
    node: &CstNode,
    keywords: &mut Vec<Rc<str>>,
    keyword_seen: &mut HashSet<Rc<str>>,
) -> Result<Symbol, BuildError> {
    let children = node.children();
    let first = &children[0];
    match first.name().as_ref() {
        "string" => {
            let text = unescape_string(&leaf_token_value(first));
            grammar::validate_name(&text).map_err(|_| {
                BuildError::Grammar(GrammarError::InvalidName {
                    name: text.clone(),
                    reason: "keyword terminals must be non-empty and whitespace-free",
                })
            })?;
            let name: Rc<str> = Rc::from(text.as_str());
            if keyword_seen.insert(name.clone()) {
                keywords.push(name.clone());
            }
            Ok(Symbol::Terminal(name))
        }
        "$" => {
            let name = leaf_token_value(&children[1]);
            grammar::validate_name(&name).map_err(BuildError::Grammar)?;
            Ok(Symbol::terminal(&name))
        }
        "id" => {
            let name = leaf_token_value(first);
            grammar::validate_name(&name).map_err(BuildError::Grammar)?;
            Ok(Symbol::non_terminal(&name))
        }
        "macro_sym" => translate_macro(first, keywords, keyword_seen),
        other => unreachable!("unexpected symbol child '{}'", other),
    }
}

fn translate_macro(
    node: &CstNode,
    keywords: &mut Vec<Rc<str>>,
    keyword_seen: &mut HashSet<Rc<str>>,
) -> Result<Symbol, BuildError> {
    let children = node.children();
    match children[0].name().as_ref() {
        "(" => {
            let mut inner: Vec<Symbol> = Vec::new();
            for child in children {
                if child.name().as_ref() == "symbol" {
                    inner.push(translate_symbol(child, keywords, keyword_seen)?);
                }
            }
            Ok(Symbol::grouping(inner))
        }
        "|" => Ok(Symbol::pipe()),
        "symbol" => {
            let operand = translate_symbol(&children[0], keywords, keyword_seen)?;
            let operator = children[1].name();
            match operator.as_ref() {
                "?" => Ok(Symbol::nullable(operand)),
                "*" => Ok(Symbol::zero_or_more(operand)),
                "+" => Ok(Symbol::one_or_more(operand)),
                other => unreachable!("unexpected postfix operator '{}'", other),
            }
        }
        other => unreachable!("unexpected macro child '{}'", other),
    }
}

/// The token value of the first direct child leaf with the given name.
/// Direct lookup matters: a lexeme declaration's annotation subtree holds
/// string leaves of its own.
fn leaf_value(node: &CstNode, name: &str) -> String {
    let leaf = node
        .children()
        .iter()
        .find(|child| child.name().as_ref() == name)
        .expect("the meta grammar guarantees the leaf");
    leaf_token_value(leaf)
}

fn leaf_token_value(leaf: &CstNode) -> String {
    leaf.token()
        .expect("named leaves carry their token")
        .value
        .clone()
}

/// Strip the surrounding quotes and decode the recognized escapes
/// (`\"`, `\\`, `\n`, `\t`, `\r`); any other escape keeps its backslash so
/// regex-level escapes pass through undisturbed.
pub(crate) fn unescape_string(quoted: &str) -> String {
    let chars: Vec<char> = quoted.chars().collect();
    debug_assert!(chars.len() >= 2, "string tokens include their quotes");
    let inner = &chars[1..chars.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut index = 0;
    while index < inner.len() {
        let c = inner[index];
        if c == '\\' && index + 1 < inner.len() {
            match inner[index + 1] {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
            index += 2;
        } else {
            out.push(c);
            index += 1;
        }
    }
    out
}
