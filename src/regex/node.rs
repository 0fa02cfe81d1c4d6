use super::{Charset, Lexeme, LexemeTag, RegexKind, RegexNode};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

impl Lexeme {
    pub fn new(name: &str, pattern: Rc<RegexNode>, is_ignored: bool, charset: Rc<Charset>) -> Self {
        Self {
            name: Rc::from(name),
            pattern,
            is_ignored,
            charset,
        }
    }
}

impl RegexNode {
    fn build(kind: RegexKind) -> Rc<Self> {
        let contains_epsilon = match &kind {
            RegexKind::Epsilon => true,
            RegexKind::EmptySet => false,
            RegexKind::Literal(_) | RegexKind::Anything(_) | RegexKind::Class { .. } => false,
            RegexKind::Union(left, right) => left.contains_epsilon || right.contains_epsilon,
            RegexKind::Concat(left, right) => left.contains_epsilon && right.contains_epsilon,
            RegexKind::Star(_) => true,
        };
        let hash = structural_hash(&kind);
        Rc::new(Self {
            kind,
            contains_epsilon,
            hash,
            lexeme: None,
        })
    }

    pub fn epsilon() -> Rc<Self> {
        Self::build(RegexKind::Epsilon)
    }

    pub fn empty_set() -> Rc<Self> {
        Self::build(RegexKind::EmptySet)
    }

    pub fn literal(c: char) -> Rc<Self> {
        Self::build(RegexKind::Literal(c))
    }

    pub fn union(left: Rc<Self>, right: Rc<Self>) -> Rc<Self> {
        Self::build(RegexKind::Union(left, right))
    }

    pub fn concat(left: Rc<Self>, right: Rc<Self>) -> Rc<Self> {
        Self::build(RegexKind::Concat(left, right))
    }

    pub fn star(inner: Rc<Self>) -> Rc<Self> {
        Self::build(RegexKind::Star(inner))
    }

    pub fn anything(charset: Rc<Charset>) -> Rc<Self> {
        Self::build(RegexKind::Anything(charset))
    }

    pub fn class(charset: Rc<Charset>, negated: bool, chars: BTreeSet<char>) -> Rc<Self> {
        Self::build(RegexKind::Class {
            charset,
            negated,
            chars,
        })
    }

    /// Fold a list into a right-leaning union. An empty list yields the
    /// empty set.
    pub fn union_all(mut nodes: Vec<Rc<Self>>) -> Rc<Self> {
        match nodes.pop() {
            None => Self::empty_set(),
            Some(last) => nodes
                .into_iter()
                .rev()
                .fold(last, |acc, node| Self::union(node, acc)),
        }
    }

    /// Fold a list into a right-leaning concatenation. An empty list yields
    /// epsilon.
    pub fn concat_all(mut nodes: Vec<Rc<Self>>) -> Rc<Self> {
        match nodes.pop() {
            None => Self::epsilon(),
            Some(last) => nodes
                .into_iter()
                .rev()
                .fold(last, |acc, node| Self::concat(node, acc)),
        }
    }

    /// A literal sequence matching exactly `text`.
    pub fn literal_sequence(text: &str) -> Rc<Self> {
        Self::concat_all(text.chars().map(Self::literal).collect())
    }

    /// The union of the literals in the inclusive character range.
    pub fn char_range(from: char, to: char) -> Rc<Self> {
        let nodes: Vec<Rc<Self>> = (from as u32..=to as u32)
            .filter_map(char::from_u32)
            .map(Self::literal)
            .collect();
        Self::union_all(nodes)
    }

    pub fn kind(&self) -> &RegexKind {
        &self.kind
    }

    pub fn contains_epsilon(&self) -> bool {
        self.contains_epsilon
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self.kind, RegexKind::Epsilon)
    }

    pub fn is_empty_set(&self) -> bool {
        matches!(self.kind, RegexKind::EmptySet)
    }

    pub fn tag(&self) -> Option<&Rc<LexemeTag>> {
        self.lexeme.as_ref()
    }

    /// A copy of this node carrying `tag`; children keep their own tags.
    pub fn with_tag(self: &Rc<Self>, tag: Option<Rc<LexemeTag>>) -> Rc<Self> {
        if self.lexeme == tag {
            return Rc::clone(self);
        }
        Rc::new(Self {
            kind: self.kind.clone(),
            contains_epsilon: self.contains_epsilon,
            hash: self.hash,
            lexeme: tag,
        })
    }

    /// A copy of the whole tree with every node tagged as belonging to the
    /// given lexeme. Used once per lexeme before DFA construction; later
    /// derivations preserve the tags by construction.
    pub fn tag_deep(self: &Rc<Self>, tag: &Rc<LexemeTag>) -> Rc<Self> {
        let kind = match &self.kind {
            RegexKind::Union(left, right) => {
                RegexKind::Union(left.tag_deep(tag), right.tag_deep(tag))
            }
            RegexKind::Concat(left, right) => {
                RegexKind::Concat(left.tag_deep(tag), right.tag_deep(tag))
            }
            RegexKind::Star(inner) => RegexKind::Star(inner.tag_deep(tag)),
            other => other.clone(),
        };
        Rc::new(Self {
            kind,
            contains_epsilon: self.contains_epsilon,
            hash: self.hash,
            lexeme: Some(Rc::clone(tag)),
        })
    }

    /// The alphabet of the pattern: every character the pattern can consume,
    /// plus the given extras.
    pub fn alphabet(&self, extras: &[char]) -> BTreeSet<char> {
        let mut set = BTreeSet::new();
        self.collect_alphabet(&mut set);
        set.extend(extras.iter().copied());
        set
    }

    fn collect_alphabet(&self, into: &mut BTreeSet<char>) {
        match &self.kind {
            RegexKind::Epsilon | RegexKind::EmptySet => {}
            RegexKind::Literal(c) => {
                into.insert(*c);
            }
            RegexKind::Union(left, right) | RegexKind::Concat(left, right) => {
                left.collect_alphabet(into);
                right.collect_alphabet(into);
            }
            RegexKind::Star(inner) => inner.collect_alphabet(into),
            RegexKind::Anything(charset) => into.extend(charset.chars()),
            RegexKind::Class {
                charset,
                negated,
                chars,
            } => {
                if *negated {
                    into.extend(charset.chars().filter(|c| !chars.contains(c)));
                } else {
                    into.extend(chars.iter().copied());
                }
            }
        }
    }

    /// Whether the class or anything-node accepts `c`; [None] for other
    /// variants.
    pub(crate) fn char_set_match(&self, c: char) -> Option<bool> {
        match &self.kind {
            RegexKind::Anything(charset) => Some(charset.contains(c)),
            RegexKind::Class {
                charset,
                negated,
                chars,
            } => {
                if *negated {
                    Some(!chars.contains(&c) && charset.contains(c))
                } else {
                    Some(chars.contains(&c))
                }
            }
            _ => None,
        }
    }

    /// The canonical state-identity string: the structural form annotated
    /// with lexeme tags, so two states merge only when both their structure
    /// and their lexeme attribution agree.
    pub fn state_key(&self) -> String {
        let mut out = String::new();
        self.write_state_key(&mut out)
            .expect("writing to a string cannot fail");
        out
    }

    fn write_state_key(&self, out: &mut String) -> std::fmt::Result {
        match &self.kind {
            RegexKind::Union(left, right) => {
                out.push('(');
                left.write_state_key(out)?;
                out.push('|');
                right.write_state_key(out)?;
                out.push(')');
            }
            RegexKind::Concat(left, right) => {
                out.push('(');
                left.write_state_key(out)?;
                out.push('·');
                right.write_state_key(out)?;
                out.push(')');
            }
            RegexKind::Star(inner) => {
                out.push('(');
                inner.write_state_key(out)?;
                out.push_str(")*");
            }
            leaf => {
                write!(out, "{}", DisplayKind(leaf))?;
                if let Some(tag) = &self.lexeme {
                    write!(out, "⟨{}⟩", tag.name)?;
                }
                return Ok(());
            }
        }
        if let Some(tag) = &self.lexeme {
            write!(out, "⟨{}⟩", tag.name)?;
        }
        Ok(())
    }
}

fn structural_hash(kind: &RegexKind) -> u64 {
    let mut hasher = DefaultHasher::new();
    match kind {
        RegexKind::Epsilon => 0u8.hash(&mut hasher),
        RegexKind::EmptySet => 1u8.hash(&mut hasher),
        RegexKind::Literal(c) => {
            2u8.hash(&mut hasher);
            c.hash(&mut hasher);
        }
        RegexKind::Union(left, right) => {
            3u8.hash(&mut hasher);
            left.hash.hash(&mut hasher);
            right.hash.hash(&mut hasher);
        }
        RegexKind::Concat(left, right) => {
            4u8.hash(&mut hasher);
            left.hash.hash(&mut hasher);
            right.hash.hash(&mut hasher);
        }
        RegexKind::Star(inner) => {
            5u8.hash(&mut hasher);
            inner.hash.hash(&mut hasher);
        }
        RegexKind::Anything(charset) => {
            6u8.hash(&mut hasher);
            charset.hash(&mut hasher);
        }
        RegexKind::Class {
            charset,
            negated,
            chars,
        } => {
            7u8.hash(&mut hasher);
            charset.hash(&mut hasher);
            negated.hash(&mut hasher);
            chars.hash(&mut hasher);
        }
    }
    hasher.finish()
}

impl PartialEq for RegexNode {
    /// Structural equality; the lexeme tag is ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        match (&self.kind, &other.kind) {
            (RegexKind::Epsilon, RegexKind::Epsilon) => true,
            (RegexKind::EmptySet, RegexKind::EmptySet) => true,
            (RegexKind::Literal(a), RegexKind::Literal(b)) => a == b,
            (RegexKind::Union(al, ar), RegexKind::Union(bl, br))
            | (RegexKind::Concat(al, ar), RegexKind::Concat(bl, br)) => al == bl && ar == br,
            (RegexKind::Star(a), RegexKind::Star(b)) => a == b,
            (RegexKind::Anything(a), RegexKind::Anything(b)) => a == b,
            (
                RegexKind::Class {
                    charset: ac,
                    negated: an,
                    chars: ach,
                },
                RegexKind::Class {
                    charset: bc,
                    negated: bn,
                    chars: bch,
                },
            ) => ac == bc && an == bn && ach == bch,
            _ => false,
        }
    }
}
impl Eq for RegexNode {}

impl Hash for RegexNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

struct DisplayKind<'k>(&'k RegexKind);

impl Display for DisplayKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            RegexKind::Epsilon => write!(f, "ε"),
            RegexKind::EmptySet => write!(f, "∅"),
            RegexKind::Literal(c) => match c {
                '\n' => write!(f, "\\n"),
                '\r' => write!(f, "\\r"),
                '\t' => write!(f, "\\t"),
                '\0' => write!(f, "\\0"),
                '(' | ')' | '|' | '*' | '·' | '\\' => write!(f, "\\{}", c),
                _ => write!(f, "{}", c),
            },
            RegexKind::Anything(charset) => write!(f, ".<{}>", charset),
            RegexKind::Class {
                charset,
                negated,
                chars,
            } => {
                write!(f, "[")?;
                if *negated {
                    write!(f, "^")?;
                }
                for c in chars {
                    write!(f, "{}", c.escape_default())?;
                }
                write!(f, "]<{}>", charset)
            }
            _ => unreachable!("composite kinds are rendered by the node display"),
        }
    }
}

impl Display for RegexNode {
    /// The canonical structural form, without lexeme annotations.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RegexKind::Union(left, right) => write!(f, "({}|{})", left, right),
            RegexKind::Concat(left, right) => write!(f, "({}·{})", left, right),
            RegexKind::Star(inner) => write!(f, "({})*", inner),
            leaf => write!(f, "{}", DisplayKind(leaf)),
        }
    }
}
