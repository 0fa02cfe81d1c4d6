use super::{Code, Position, LINE_BREAKS};
use once_cell::unsync::OnceCell;

impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value)
    }
}

impl<'c> Code<'c> {
    pub fn new(text: &'c str) -> Self {
        Self {
            text,
            chars: OnceCell::new(),
            line_breaks: OnceCell::new(),
        }
    }

    /// The input as a character sequence. Built once on first use.
    pub fn obtain_chars(&self) -> &Vec<char> {
        self.chars.get_or_init(|| self.text.chars().collect())
    }

    /// Number of characters in the input.
    pub fn len(&self) -> usize {
        self.obtain_chars().len()
    }

    pub fn is_empty(&self) -> bool {
        self.obtain_chars().is_empty()
    }

    pub fn char_at(&self, pointer: usize) -> Option<char> {
        self.obtain_chars().get(pointer).copied()
    }

    /// The substring covering the character range `[start..end)`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.obtain_chars()[start..end].iter().collect()
    }

    /// Character indices at which a line break occurs.
    pub fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.obtain_chars()
                .iter()
                .enumerate()
                .filter_map(|(index, c)| {
                    if LINE_BREAKS.contains(c) {
                        Some(index)
                    } else {
                        None
                    }
                })
                .collect()
        })
    }

    /// The 1-based line/column position of the character at `pointer`.
    pub fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            Position::new(1, pointer + 1)
        } else {
            let break_point = line_breaks[index - 1];
            Position::new(index + 1, pointer - break_point)
        }
    }
}
