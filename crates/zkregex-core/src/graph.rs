//! Serialized minimal DFA.
//!
//! This is the hand-off format between automaton construction and code
//! generation. Node 0 is the start state, which doubles as the idle state of
//! a scanning circuit. Exactly one node accepts and it is never node 0.
//!
//! The JSON form is an array of `{"type": "accept" | "", "edges": {key: target}}`
//! where `key` is [`ByteSet::key`]. Capture-group tags, when present, travel
//! in a parallel `"tags": {key: group}` map.

use std::collections::VecDeque;
use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ANCHOR_BYTE, ByteSet, START_NODE};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("graph has no nodes")]
    Empty,
    #[error("accept node must exist")]
    NoAcceptNode,
    #[error("size of accept nodes must be one (found {0})")]
    MultipleAcceptNodes(usize),
    #[error("accept node must not be 0")]
    AcceptNodeAtStart,
    #[error("edge from node {from} targets missing node {target}")]
    DanglingEdge { from: usize, target: usize },
    #[error("node {node} has more than one transition on byte {byte}")]
    Nondeterministic { node: usize, byte: u8 },
    #[error("node {node} has an edge with no bytes")]
    EmptyEdge { node: usize },
    #[error("invalid edge key `{0}`")]
    InvalidEdgeKey(String),
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),
}

/// One labeled transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub chars: ByteSet,
    pub target: usize,
    /// Capture group (decomposed part index) this transition belongs to.
    pub tag: Option<usize>,
}

impl GraphEdge {
    pub fn new(chars: ByteSet, target: usize) -> Self {
        Self {
            chars,
            target,
            tag: None,
        }
    }

    pub fn tagged(mut self, tag: usize) -> Self {
        self.tag = Some(tag);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphNode {
    pub accept: bool,
    /// Outgoing edges. Their byte sets are pairwise disjoint; two edges may
    /// share a target when they carry different tags.
    pub edges: Vec<GraphEdge>,
}

/// Input symbol fed to [`Graph::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// The virtual byte in front of every input.
    Sentinel,
    Byte(u8),
}

/// Leftmost-longest match found by [`Graph::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Tag of the transition that consumed each byte of `start..end`.
    pub tags: Vec<Option<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RawNode>", into = "Vec<RawNode>")]
pub struct Graph {
    nodes: Vec<GraphNode>,
}

impl Graph {
    pub fn new(nodes: Vec<GraphNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &GraphNode {
        self.ensure_node(idx)
    }

    pub fn accept_nodes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.accept)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the single accept node, enforcing the accept invariants.
    pub fn accept_node(&self) -> Result<usize, GraphError> {
        let accepts = self.accept_nodes();
        match accepts.as_slice() {
            [] => Err(GraphError::NoAcceptNode),
            [START_NODE] => Err(GraphError::AcceptNodeAtStart),
            [idx] => Ok(*idx),
            _ => Err(GraphError::MultipleAcceptNodes(accepts.len())),
        }
    }

    /// Check structural well-formedness and the accept invariants.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            let mut seen = ByteSet::new();
            for edge in &node.edges {
                if edge.target >= self.nodes.len() {
                    return Err(GraphError::DanglingEdge {
                        from: idx,
                        target: edge.target,
                    });
                }
                if edge.chars.is_empty() {
                    return Err(GraphError::EmptyEdge { node: idx });
                }
                if let Some(byte) = seen.intersection(&edge.chars).first() {
                    return Err(GraphError::Nondeterministic { node: idx, byte });
                }
                seen = seen.union(&edge.chars);
            }
        }
        self.accept_node().map(|_| ())
    }

    /// Reverse adjacency: for every node, `(source, edge)` pairs in ascending
    /// source order.
    pub fn incoming(&self) -> Vec<Vec<(usize, &GraphEdge)>> {
        let mut rev: Vec<Vec<(usize, &GraphEdge)>> = vec![Vec::new(); self.nodes.len()];
        for (from, node) in self.nodes.iter().enumerate() {
            for edge in &node.edges {
                if let Some(slot) = rev.get_mut(edge.target) {
                    slot.push((from, edge));
                }
            }
        }
        rev
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reference simulation

    /// Follow one transition. Only the start node consumes the sentinel, and
    /// only through its anchor edge; message bytes never match the anchor.
    pub fn step(&self, state: usize, symbol: Symbol) -> Option<&GraphEdge> {
        let edges = &self.nodes.get(state)?.edges;
        let byte = match symbol {
            Symbol::Sentinel if state == START_NODE => ANCHOR_BYTE,
            Symbol::Sentinel | Symbol::Byte(ANCHOR_BYTE) => return None,
            Symbol::Byte(b) => b,
        };
        edges.iter().find(|e| e.chars.contains(byte))
    }

    /// State after consuming the sentinel at position 0.
    pub fn initial_state(&self) -> usize {
        self.step(START_NODE, Symbol::Sentinel)
            .map_or(START_NODE, |e| e.target)
    }

    /// State reached after feeding the sentinel and then `input`, if the run survives.
    pub fn walk(&self, input: &[u8]) -> Option<usize> {
        input.iter().try_fold(self.initial_state(), |state, b| {
            self.step(state, Symbol::Byte(*b)).map(|e| e.target)
        })
    }

    /// Whether the whole of `input` is a word of the language.
    pub fn is_full_match(&self, input: &[u8]) -> bool {
        self.walk(input)
            .is_some_and(|state| self.nodes.get(state).is_some_and(|n| n.accept))
    }

    /// Leftmost-longest match anywhere in `input`.
    ///
    /// Runs starting at offset 0 begin after the sentinel, so anchored
    /// transitions are available there and only there.
    pub fn find(&self, input: &[u8]) -> Option<Match> {
        for start in 0..=input.len() {
            let mut state = if start == 0 {
                self.initial_state()
            } else {
                START_NODE
            };
            let mut tags = Vec::new();
            let mut best = self.nodes.get(state)?.accept.then_some(0);

            for &b in &input[start..] {
                let Some(edge) = self.step(state, Symbol::Byte(b)) else {
                    break;
                };
                tags.push(edge.tag);
                state = edge.target;
                if self.ensure_node(state).accept {
                    best = Some(tags.len());
                }
            }

            if let Some(len) = best {
                tags.truncate(len);
                return Some(Match {
                    start,
                    end: start + len,
                    tags,
                });
            }
        }
        None
    }

    /// Length of the shortest accepted input, or `None` when nothing is accepted.
    ///
    /// The sentinel step is free, so anchored prefixes cost nothing. Anchor
    /// bytes away from the start node can never fire and are ignored.
    pub fn shortest_match_len(&self) -> Option<usize> {
        let mut dist = vec![usize::MAX; self.nodes.len()];
        let mut queue = VecDeque::new();
        *dist.get_mut(START_NODE)? = 0;
        queue.push_back(START_NODE);

        while let Some(state) = queue.pop_front() {
            let d = dist[state];
            if self.nodes[state].accept {
                return Some(d);
            }
            for edge in &self.nodes[state].edges {
                let anchored = edge.chars.contains(ANCHOR_BYTE);
                let cost = match (state == START_NODE, anchored) {
                    (true, true) => 0,
                    (false, true) if edge.chars.len() == 1 => continue,
                    _ => 1,
                };
                if d + cost < dist[edge.target] {
                    dist[edge.target] = d + cost;
                    if cost == 0 {
                        queue.push_front(edge.target);
                    } else {
                        queue.push_back(edge.target);
                    }
                }
            }
        }
        None
    }

    // ─────────────────────────────────────────────────────────────────────
    // Text forms

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("graph serialization never fails")
    }

    /// Parse and [`validate`](Self::validate) a graph in its JSON form.
    pub fn from_json(json: &str) -> Result<Graph, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Debug listing: one line per edge plus one per accept node.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.accept {
                writeln!(out, "N{idx}: accept").expect("String write never fails");
            }
            for edge in &node.edges {
                write!(out, "N{idx}: [{}] → N{}", edge.chars, edge.target)
                    .expect("String write never fails");
                if let Some(tag) = edge.tag {
                    write!(out, " @{tag}").expect("String write never fails");
                }
                out.push('\n');
            }
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────
// JSON shape

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    edges: IndexMap<String, usize>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    tags: IndexMap<String, usize>,
}

impl From<Graph> for Vec<RawNode> {
    fn from(graph: Graph) -> Self {
        graph
            .nodes
            .into_iter()
            .map(|node| {
                let mut edges = IndexMap::new();
                let mut tags = IndexMap::new();
                for edge in node.edges {
                    let key = edge.chars.key();
                    if let Some(tag) = edge.tag {
                        tags.insert(key.clone(), tag);
                    }
                    edges.insert(key, edge.target);
                }
                RawNode {
                    kind: if node.accept { "accept" } else { "" }.to_string(),
                    edges,
                    tags,
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<RawNode>> for Graph {
    type Error = GraphError;

    fn try_from(raw: Vec<RawNode>) -> Result<Self, Self::Error> {
        let mut nodes = Vec::with_capacity(raw.len());
        for node in raw {
            let accept = match node.kind.as_str() {
                "accept" => true,
                "" => false,
                other => return Err(GraphError::UnknownNodeType(other.to_string())),
            };
            let mut edges = Vec::with_capacity(node.edges.len());
            for (key, target) in node.edges {
                let chars = ByteSet::from_key(&key)
                    .ok_or_else(|| GraphError::InvalidEdgeKey(key.clone()))?;
                edges.push(GraphEdge {
                    chars,
                    target,
                    tag: node.tags.get(&key).copied(),
                });
            }
            nodes.push(GraphNode { accept, edges });
        }
        let graph = Graph { nodes };
        graph.validate()?;
        Ok(graph)
    }
}
