//! The recursive descent parser for lexeme pattern strings.
//!
//! Surface syntax: literals, `\`-escapes, `.` (any character of the charset),
//! `(…)` grouping, postfix `? * +`, infix `|`, character classes `[…]` with
//! ranges and leading `^` negation, and `{name}` references to declared
//! fragments.

use super::{Charset, RegexNode};
use crate::error::RegexError;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Parse a pattern string into a regex tree, resolving `.` and negated
/// classes against `charset` and `{name}` references against `fragments`.
pub fn parse_pattern(
    pattern: &str,
    charset: &Rc<Charset>,
    fragments: &HashMap<Rc<str>, Rc<RegexNode>>,
) -> Result<Rc<RegexNode>, RegexError> {
    let mut parser = PatternParser {
        pattern,
        chars: pattern.chars().collect(),
        position: 0,
        charset: Rc::clone(charset),
        fragments,
    };
    let node = parser.parse_alternation()?;
    if parser.position != parser.chars.len() {
        return Err(parser.malformed("unexpected trailing input"));
    }
    Ok(node)
}

struct PatternParser<'p> {
    pattern: &'p str,
    chars: Vec<char>,
    position: usize,
    charset: Rc<Charset>,
    fragments: &'p HashMap<Rc<str>, Rc<RegexNode>>,
}

impl<'p> PatternParser<'p> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn malformed(&self, message: &str) -> RegexError {
        RegexError::MalformedPattern {
            pattern: self.pattern.to_string(),
            position: self.position,
            message: message.to_string(),
        }
    }

    fn parse_alternation(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some('|') {
            self.bump();
            branches.push(self.parse_concat()?);
        }
        Ok(RegexNode::union_all(branches))
    }

    fn parse_concat(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            if matches!(c, '|' | ')') {
                break;
            }
            parts.push(self.parse_postfix()?);
        }
        if parts.is_empty() {
            return Err(self.malformed("empty pattern or alternative branch"));
        }
        Ok(RegexNode::concat_all(parts))
    }

    fn parse_postfix(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        let mut node = self.parse_atom()?;
        while let Some(op) = self.peek() {
            node = match op {
                '*' => RegexNode::star(node),
                '+' => RegexNode::concat(Rc::clone(&node), RegexNode::star(node)),
                '?' => RegexNode::union(node, RegexNode::epsilon()),
                _ => break,
            };
            self.bump();
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        match self.peek() {
            None => Err(self.malformed("expected an atom")),
            Some('(') => {
                self.bump();
                let inner = self.parse_alternation()?;
                if self.bump() != Some(')') {
                    return Err(self.malformed("unbalanced '('"));
                }
                Ok(inner)
            }
            Some('[') => self.parse_class(),
            Some('{') => self.parse_fragment(),
            Some('.') => {
                self.bump();
                Ok(RegexNode::anything(Rc::clone(&self.charset)))
            }
            Some('\\') => {
                self.bump();
                let c = self.parse_escape()?;
                Ok(RegexNode::literal(c))
            }
            Some('*' | '+' | '?') => Err(self.malformed("dangling postfix operator")),
            Some(')' | '|') => Err(self.malformed("unexpected delimiter")),
            Some(c) => {
                self.bump();
                Ok(RegexNode::literal(c))
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, RegexError> {
        match self.bump() {
            None => Err(self.malformed("trailing '\\'")),
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some(c) if !c.is_alphanumeric() => Ok(c),
            Some(_) => Err(self.malformed("unsupported escape")),
        }
    }

    fn parse_class(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        self.bump(); // consume '['
        let negated = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };

        let mut chars: BTreeSet<char> = BTreeSet::new();
        loop {
            match self.peek() {
                None => return Err(self.malformed("unbalanced '['")),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let from = self.parse_class_char()?;
                    if self.peek() == Some('-') && self.chars.get(self.position + 1) != Some(&']') {
                        self.bump(); // consume '-'
                        let to = self.parse_class_char()?;
                        if from > to {
                            return Err(RegexError::EmptyRange { from, to });
                        }
                        chars.extend((from as u32..=to as u32).filter_map(char::from_u32));
                    } else {
                        chars.insert(from);
                    }
                }
            }
        }

        if chars.is_empty() {
            return Err(self.malformed("empty character class"));
        }
        Ok(RegexNode::class(
            Rc::clone(&self.charset),
            negated,
            chars,
        ))
    }

    fn parse_class_char(&mut self) -> Result<char, RegexError> {
        match self.bump() {
            None => Err(self.malformed("unbalanced '['")),
            Some('\\') => self.parse_escape(),
            Some(c) => Ok(c),
        }
    }

    fn parse_fragment(&mut self) -> Result<Rc<RegexNode>, RegexError> {
        self.bump(); // consume '{'
        let mut name = String::new();
        loop {
            match self.bump() {
                None => return Err(self.malformed("unbalanced '{'")),
                Some('}') => break,
                Some(c) => name.push(c),
            }
        }
        match self.fragments.get(name.as_str()) {
            Some(node) => Ok(Rc::clone(node)),
            None => Err(RegexError::UnknownFragment { name }),
        }
    }
}
