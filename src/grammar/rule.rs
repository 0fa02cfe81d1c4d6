use super::{ProductionRule, Sentence, Symbol};
use std::fmt::{Display, Formatter};

impl ProductionRule {
    /// Create a production rule. The head must be a non-terminal.
    pub fn new(head: Symbol, body: Sentence) -> Self {
        debug_assert!(head.is_non_terminal(), "production head must be a non-terminal");
        Self { head, body }
    }

    pub fn head(&self) -> &Symbol {
        &self.head
    }

    pub fn body(&self) -> &Sentence {
        &self.body
    }

    /// Whether the body is the ε sentence.
    pub fn is_epsilon(&self) -> bool {
        self.body.is_epsilon()
    }
}

impl Display for ProductionRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} ;", self.head, self.body)
    }
}
