use super::{Token, TokenStream};
use std::collections::HashSet;
use std::rc::Rc;

impl<'lex> TokenStream<'lex> {
    /// Wrap a token slice, hiding every token whose type is in the ignored
    /// set. The underlying stream is untouched.
    pub fn new(tokens: &'lex [Token], ignored: &HashSet<Rc<str>>) -> Self {
        let filtered = tokens
            .iter()
            .enumerate()
            .filter_map(|(index, token)| {
                if ignored.contains(&token.token_type) {
                    None
                } else {
                    Some(index)
                }
            })
            .collect();
        Self { tokens, filtered }
    }

    /// Number of visible tokens.
    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// The visible token at the filtered index.
    pub fn token_at(&self, index: usize) -> Option<&'lex Token> {
        self.filtered.get(index).map(|&i| &self.tokens[i])
    }

    /// End position of the visible token before `index`; 0 when there is
    /// none. Anchors zero-length spans of ε reductions.
    pub fn previous_end(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.token_at(index - 1).map_or(0, |token| token.end)
        }
    }

    /// End position of the last underlying token, ignored ones included.
    pub fn end_position(&self) -> usize {
        self.tokens.last().map_or(0, |token| token.end)
    }

    /// The underlying unfiltered tokens.
    pub fn tokens(&self) -> &'lex [Token] {
        self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &'lex Token> + '_ {
        self.filtered.iter().map(move |&i| &self.tokens[i])
    }
}
