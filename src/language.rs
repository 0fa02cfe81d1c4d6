//! The compiled language: the facade tying the tokenizer and parser
//! together.

use crate::error::{BuildError, GrammarError, ParseError, TokenizeError};
use crate::gdef::{translate, MetaParser};
use crate::grammar::Grammar;
use crate::parser::{CstNode, LrParser};
use crate::tokenizer::{DfaBuilder, Token, TokenStream, Tokenizer};
use crate::util::Code;
use std::collections::HashSet;
use std::rc::Rc;

/// A compiled language: the DFA tokenizer and the LR(1) parser built from a
/// grammar definition. Immutable after compilation; every parse invocation
/// creates fresh per-parse state, so a compiled language can be reused
/// freely.
#[derive(Debug)]
pub struct Language {
    tokenizer: Tokenizer,
    parser: LrParser,
    whitelist: HashSet<Rc<str>>,
    description: String,
}

impl Language {
    /// Compile a grammar definition with an existing meta-grammar handle.
    ///
    /// Every build error that can be found is returned in one list: problems
    /// in the definition text, duplicate or nullable lexemes, undefined
    /// non-terminal references and all LR table conflicts.
    pub fn compile(meta: &MetaParser, definition: &str) -> Result<Language, Vec<BuildError>> {
        let tree = meta.parse(definition).map_err(|err| {
            vec![BuildError::Grammar(GrammarError::MalformedDefinition {
                position: err.position(),
                message: err.to_string(),
            })]
        })?;
        let definition = translate::translate(&tree)?;
        let description = describe(&definition);

        let mut errors: Vec<BuildError> = Vec::new();

        let tokenizer = match DfaBuilder::new(definition.lexemes, &definition.ignored_chars)
            .build_table()
        {
            Ok(table) => Some(Tokenizer::new(table)),
            Err(mut table_errors) => {
                errors.append(&mut table_errors);
                None
            }
        };

        let grammar = Grammar::new(definition.start, definition.rules);
        let whitelist: HashSet<Rc<str>> = grammar
            .non_terminals()
            .iter()
            .filter_map(|nt| nt.name().cloned())
            .collect();
        let parser = match LrParser::new(&grammar) {
            Ok(parser) => Some(parser),
            Err(mut parser_errors) => {
                errors.append(&mut parser_errors);
                None
            }
        };

        match (tokenizer, parser) {
            (Some(tokenizer), Some(parser)) if errors.is_empty() => Ok(Language {
                tokenizer,
                parser,
                whitelist,
                description,
            }),
            _ => Err(errors),
        }
    }

    /// A readable summary of the compiled language: every lexeme with its
    /// pattern, the ignored characters, and the production rules in
    /// canonical BNF.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Compile with a freshly built meta-grammar handle. Callers compiling
    /// more than one definition should build one [MetaParser] and use
    /// [Language::compile].
    pub fn build(definition: &str) -> Result<Language, Vec<BuildError>> {
        Language::compile(&MetaParser::new(), definition)
    }

    /// The complete token stream of the source, ignored lexemes included.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        self.tokenizer.tokenize(&Code::from(source))
    }

    /// Parse the source into its CST, with the auxiliary macro-expansion
    /// nodes pruned away.
    pub fn parse(&self, source: &str) -> Result<CstNode, ParseError> {
        Ok(self.parse_raw(source)?.reduce(&self.whitelist))
    }

    /// Parse the source into the full CST, auxiliary nodes included.
    pub fn parse_raw(&self, source: &str) -> Result<CstNode, ParseError> {
        let code = Code::from(source);
        let tokens = self.tokenizer.tokenize(&code)?;
        let stream = TokenStream::new(&tokens, self.tokenizer.ignored());
        let tree = self.parser.parse(&stream)?;
        Ok(tree)
    }

    /// The expanded, augmented grammar the parser runs on.
    pub fn grammar(&self) -> &Grammar {
        self.parser.grammar()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

fn describe(definition: &translate::Definition) -> String {
    let mut out = String::new();
    out.push_str("lexemes {\n");
    for lexeme in &definition.lexemes {
        let ignored = if lexeme.is_ignored { " (ignored)" } else { "" };
        out.push_str(&format!(
            "    {} : /{}/ <{}>{}\n",
            lexeme.name, lexeme.pattern, lexeme.charset, ignored
        ));
    }
    out.push_str("}\n");
    if !definition.ignored_chars.is_empty() {
        let chars: Vec<String> = definition
            .ignored_chars
            .iter()
            .map(|c| c.escape_default().to_string())
            .collect();
        out.push_str(&format!("ignored-chars {{ {} }}\n", chars.join(" ")));
    }
    out.push('\n');
    for rule in &definition.rules {
        out.push_str(&format!("{}\n", rule));
    }
    out
}
