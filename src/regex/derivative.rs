use super::{DerivationTrace, DerivativeCalculator, RegexKind, RegexNode};
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Display for DerivationTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.character {
            Some(c) => write!(
                f,
                "∂_{} {} = {} ({})",
                c.escape_default(),
                self.source,
                self.result,
                self.reason
            ),
            None => write!(f, "{} ⇒ {} ({})", self.source, self.result, self.reason),
        }
    }
}

impl Default for DerivativeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl DerivativeCalculator {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            log: OnceCell::new(),
        }
    }

    /// Set a log label to debug derivation steps.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Forget the recorded history. Called once per DFA-state expansion.
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[DerivationTrace] {
        &self.history
    }

    /// The simplified Brzozowski derivative ∂_c of the pattern: the pattern
    /// matching exactly the suffixes v such that c·v is matched by the input.
    pub fn derive(&mut self, node: &Rc<RegexNode>, c: char) -> Rc<RegexNode> {
        let raw = self.derive_raw(node, c);
        let simplified = self.simplify(&raw);
        self.record(node, Some(c), &simplified, "derivative");

        #[cfg(debug_assertions)]
        if let Some(log) = self.log.get() {
            if log.order() >= Log::Verbose(()).order() {
                println!("[{}; Derive]: ∂_{} {} = {}", log, c, node, simplified);
            }
        }

        simplified
    }

    /// The unsimplified derivative. Every produced node inherits the lexeme
    /// tag of its source so accepting states keep their lexeme attribution.
    fn derive_raw(&mut self, node: &Rc<RegexNode>, c: char) -> Rc<RegexNode> {
        let tag = node.tag().cloned();
        match node.kind() {
            RegexKind::Epsilon | RegexKind::EmptySet => RegexNode::empty_set().with_tag(tag),
            RegexKind::Literal(x) => {
                if *x == c {
                    RegexNode::epsilon().with_tag(tag)
                } else {
                    RegexNode::empty_set().with_tag(tag)
                }
            }
            RegexKind::Union(left, right) => {
                let dl = self.derive_raw(left, c);
                let dr = self.derive_raw(right, c);
                RegexNode::union(dl, dr).with_tag(tag)
            }
            RegexKind::Concat(left, right) => {
                let dl = self.derive_raw(left, c);
                let first = RegexNode::concat(dl, Rc::clone(right)).with_tag(tag.clone());
                if left.contains_epsilon() {
                    let dr = self.derive_raw(right, c);
                    RegexNode::union(first, dr).with_tag(tag)
                } else {
                    first
                }
            }
            RegexKind::Star(inner) => {
                let di = self.derive_raw(inner, c);
                if di.is_empty_set() {
                    RegexNode::empty_set().with_tag(tag)
                } else {
                    RegexNode::concat(di, Rc::clone(node)).with_tag(tag)
                }
            }
            RegexKind::Anything(_) | RegexKind::Class { .. } => {
                let matched = node
                    .char_set_match(c)
                    .expect("anything/class variants answer char_set_match");
                if matched {
                    RegexNode::epsilon().with_tag(tag)
                } else {
                    RegexNode::empty_set().with_tag(tag)
                }
            }
        }
    }

    /// Apply the algebraic simplification rules until a fixpoint is reached.
    ///
    /// Rules: `A|∅ = A`, `∅|B = B`, `A|A = A`, `ε·B = B`, `A·ε = A`,
    /// `∅·X = X·∅ = ∅`, `∅* = ε`, `ε* = ε`, `(R*)* = R*`. A union of ε with
    /// an epsilon-containing side is deliberately kept: collapsing it would
    /// drop an accepting branch.
    pub fn simplify(&mut self, node: &Rc<RegexNode>) -> Rc<RegexNode> {
        let mut current = Rc::clone(node);
        loop {
            let next = self.simplify_pass(&current);
            if next == current && next.tag() == current.tag() {
                break next;
            }
            current = next;
        }
    }

    fn simplify_pass(&mut self, node: &Rc<RegexNode>) -> Rc<RegexNode> {
        let tag = node.tag().cloned();
        match node.kind() {
            RegexKind::Union(left, right) => {
                let l = self.simplify_pass(left);
                let r = self.simplify_pass(right);
                if l.is_empty_set() {
                    self.record(node, None, &r, "union with empty set");
                    r
                } else if r.is_empty_set() {
                    self.record(node, None, &l, "union with empty set");
                    l
                } else if l == r {
                    self.record(node, None, &l, "union of identical branches");
                    l
                } else {
                    RegexNode::union(l, r).with_tag(tag)
                }
            }
            RegexKind::Concat(left, right) => {
                let l = self.simplify_pass(left);
                let r = self.simplify_pass(right);
                if l.is_empty_set() || r.is_empty_set() {
                    let result = RegexNode::empty_set().with_tag(tag);
                    self.record(node, None, &result, "concat with empty set");
                    result
                } else if l.is_epsilon() {
                    self.record(node, None, &r, "concat with epsilon");
                    r
                } else if r.is_epsilon() {
                    self.record(node, None, &l, "concat with epsilon");
                    l
                } else {
                    RegexNode::concat(l, r).with_tag(tag)
                }
            }
            RegexKind::Star(inner) => {
                let i = self.simplify_pass(inner);
                if i.is_empty_set() || i.is_epsilon() {
                    let result = RegexNode::epsilon().with_tag(tag);
                    self.record(node, None, &result, "star of trivial pattern");
                    result
                } else if matches!(i.kind(), RegexKind::Star(_)) {
                    self.record(node, None, &i, "nested star");
                    i.with_tag(tag)
                } else {
                    RegexNode::star(i).with_tag(tag)
                }
            }
            _ => Rc::clone(node),
        }
    }

    fn record(
        &mut self,
        source: &Rc<RegexNode>,
        character: Option<char>,
        result: &Rc<RegexNode>,
        reason: &'static str,
    ) {
        self.history.push(DerivationTrace {
            source: source.to_string(),
            character,
            result: result.to_string(),
            reason,
        });
    }
}
