//! Pattern syntax tree.
//!
//! `+` and `?` never appear here: the parser desugars `X+` into
//! `Concat(X, Star(X))` and `X?` into `Alternation(X, Empty)`. The `\^`
//! anchor is its own node kind, never a byte of a [`Text`].

use std::fmt::Write;

use rowan::TextRange;
use zkregex_core::ByteSet;

/// What a [`NodeKind::Text`] node consumes: one byte, or any byte of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Byte(u8),
    Class(ByteSet),
}

impl Text {
    pub fn bytes(&self) -> ByteSet {
        match self {
            Text::Byte(b) => ByteSet::single(*b),
            Text::Class(set) => *set,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Empty,
    /// `\^`: consumes the start-of-input sentinel.
    Anchor,
    Text(Text),
    Concat(Vec<Node>),
    Alternation(Vec<Node>),
    Star(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Source range the node was parsed from.
    pub span: TextRange,
}

impl Node {
    pub fn new(kind: NodeKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    pub fn empty(span: TextRange) -> Self {
        Self::new(NodeKind::Empty, span)
    }

    pub fn anchor(span: TextRange) -> Self {
        Self::new(NodeKind::Anchor, span)
    }

    pub fn byte(b: u8, span: TextRange) -> Self {
        Self::new(NodeKind::Text(Text::Byte(b)), span)
    }

    pub fn class(set: ByteSet, span: TextRange) -> Self {
        Self::new(NodeKind::Text(Text::Class(set)), span)
    }

    /// Concatenation, collapsing the single-item case.
    pub fn concat(mut items: Vec<Node>, span: TextRange) -> Self {
        if items.len() == 1 {
            return items.remove(0);
        }
        Self::new(NodeKind::Concat(items), span)
    }

    /// Alternation, collapsing the single-branch case.
    pub fn alternation(mut branches: Vec<Node>, span: TextRange) -> Self {
        if branches.len() == 1 {
            return branches.remove(0);
        }
        Self::new(NodeKind::Alternation(branches), span)
    }

    pub fn star(inner: Node, span: TextRange) -> Self {
        Self::new(NodeKind::Star(Box::new(inner)), span)
    }

    /// Literal byte string as a chain of single-byte nodes.
    pub fn bytes(bytes: &[u8], span: TextRange) -> Self {
        let items = bytes.iter().map(|b| Node::byte(*b, span)).collect();
        Self::concat(items, span)
    }

    /// Indented tree listing without spans.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let line = match &self.kind {
            NodeKind::Empty => "Empty".to_string(),
            NodeKind::Anchor => "Anchor".to_string(),
            NodeKind::Text(Text::Byte(b)) => format!("Byte {}", ByteSet::single(*b)),
            NodeKind::Text(Text::Class(set)) => format!("Class [{set}]"),
            NodeKind::Concat(_) => "Concat".to_string(),
            NodeKind::Alternation(_) => "Alternation".to_string(),
            NodeKind::Star(_) => "Star".to_string(),
        };
        writeln!(out, "{indent}{line}").expect("String write never fails");

        match &self.kind {
            NodeKind::Concat(items) | NodeKind::Alternation(items) => {
                for item in items {
                    item.dump_into(out, depth + 1);
                }
            }
            NodeKind::Star(inner) => inner.dump_into(out, depth + 1),
            NodeKind::Empty | NodeKind::Anchor | NodeKind::Text(_) => {}
        }
    }
}
