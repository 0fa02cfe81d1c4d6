use super::{CstNode, Span};
use crate::tokenizer::Token;
use ptree::TreeItem;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl CstNode {
    pub fn leaf(token: Token) -> Self {
        let span = Span::new(token.start, token.end);
        CstNode::Leaf {
            name: token.token_type.clone(),
            token,
            span,
        }
    }

    /// An internal node covering its children; a childless internal node is
    /// an ε reduction anchored at `anchor`.
    pub fn internal(name: Rc<str>, children: Vec<CstNode>, anchor: usize) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::new(anchor, anchor),
        };
        CstNode::Internal {
            name,
            children,
            span,
        }
    }

    pub fn name(&self) -> &Rc<str> {
        match self {
            CstNode::Root { name, .. }
            | CstNode::Internal { name, .. }
            | CstNode::Leaf { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CstNode::Root { span, .. }
            | CstNode::Internal { span, .. }
            | CstNode::Leaf { span, .. } => *span,
        }
    }

    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Root { children, .. } | CstNode::Internal { children, .. } => children,
            CstNode::Leaf { .. } => &[],
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            CstNode::Leaf { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CstNode::Leaf { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, CstNode::Root { .. })
    }

    /// The left-to-right leaf tokens of the tree.
    pub fn leaves(&self) -> Vec<&Token> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'t>(&'t self, into: &mut Vec<&'t Token>) {
        match self {
            CstNode::Leaf { token, .. } => into.push(token),
            _ => {
                for child in self.children() {
                    child.collect_leaves(into);
                }
            }
        }
    }

    /// Search through all nested children and return the first node with the
    /// given name.
    pub fn find(&self, name: &str) -> Option<&CstNode> {
        if self.name().as_ref() == name {
            Some(self)
        } else {
            self.children().iter().find_map(|child| child.find(name))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Return all nested nodes with the given name, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&CstNode> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'t>(&'t self, name: &str, into: &mut Vec<&'t CstNode>) {
        if self.name().as_ref() == name {
            into.push(self);
        }
        for child in self.children() {
            child.collect_named(name, into);
        }
    }

    /// Prune internal nodes whose name is not in the whitelist by inlining
    /// their children into the parent's child list. Document order, spans
    /// and leaves are preserved; the root always survives.
    pub fn reduce(&self, whitelist: &HashSet<Rc<str>>) -> CstNode {
        match self {
            CstNode::Root {
                name,
                children,
                span,
            } => CstNode::Root {
                name: name.clone(),
                children: reduce_children(children, whitelist),
                span: *span,
            },
            CstNode::Internal {
                name,
                children,
                span,
            } => CstNode::Internal {
                name: name.clone(),
                children: reduce_children(children, whitelist),
                span: *span,
            },
            leaf => leaf.clone(),
        }
    }
}

fn reduce_children(children: &[CstNode], whitelist: &HashSet<Rc<str>>) -> Vec<CstNode> {
    let mut reduced: Vec<CstNode> = Vec::new();
    for child in children {
        let child = child.reduce(whitelist);
        match child {
            CstNode::Internal {
                ref name, ref children, ..
            } if !whitelist.contains(name) => {
                reduced.extend(children.iter().cloned());
            }
            kept => reduced.push(kept),
        }
    }
    reduced
}

impl Display for CstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} # {}-{}",
            self.name(),
            self.span().start,
            self.span().end
        )
    }
}

impl TreeItem for CstNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self.token() {
            Some(token) => write!(f, "{} {:?} # {}-{}", self.name(), token.value, token.start, token.end),
            None => write!(f, "{} # {}-{}", self.name(), self.span().start, self.span().end),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(CstNode::children(self))
    }
}

impl CstNode {
    /// Print the tree to standard output.
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
