use super::{MacroSymbol, Sentence, Symbol};

impl Sentence {
    /// Build a sentence from a symbol list.
    ///
    /// Embedded [MacroSymbol::Pipe] symbols are flattened away: the list is
    /// split at every pipe and the segments become one
    /// [MacroSymbol::Alternative] macro wrapping a sub-sentence per segment.
    /// An empty segment (as in `a | ;`) becomes the ε sentence. An empty
    /// input list also becomes the ε sentence.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        if symbols.is_empty() {
            return Sentence {
                symbols: vec![Symbol::Epsilon],
            };
        }
        if !symbols.iter().any(|s| s.is_pipe()) {
            return Sentence { symbols };
        }

        let mut segments: Vec<Sentence> = Vec::new();
        let mut current: Vec<Symbol> = Vec::new();
        for symbol in symbols {
            if symbol.is_pipe() {
                segments.push(Sentence::new(std::mem::take(&mut current)));
            } else {
                current.push(symbol);
            }
        }
        segments.push(Sentence::new(current));

        Sentence {
            symbols: vec![Symbol::Macro(MacroSymbol::Alternative(segments))],
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether this is the ε sentence: a single epsilon element.
    pub fn is_epsilon(&self) -> bool {
        self.symbols.len() == 1 && self.symbols[0].is_epsilon()
    }

    pub fn contains_macro(&self) -> bool {
        self.symbols.iter().any(|s| s.is_macro())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }
}

impl From<Vec<Symbol>> for Sentence {
    fn from(symbols: Vec<Symbol>) -> Self {
        Sentence::new(symbols)
    }
}
