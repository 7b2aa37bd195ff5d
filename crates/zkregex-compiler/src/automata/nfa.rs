//! Thompson construction.
//!
//! States live in a flat vector and are referenced by [`StateId`]. Every
//! syntax node compiles to a [`Fragment`] with one entry and one exit; the
//! combinators below wire fragments together with epsilon edges. The exit of
//! the root fragment is the single accept state.

use std::collections::BTreeSet;
use std::fmt::Write;

use zkregex_core::{ANCHOR_BYTE, ByteSet};

use crate::parser::{Node, NodeKind};

/// Index into `Nfa::states`.
pub type StateId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Epsilon,
    /// `\^`. Consumes [`ANCHOR_BYTE`], which stands for the sentinel.
    Anchor,
    Bytes(ByteSet),
}

impl Label {
    /// Whether a transition with this label consumes `byte`.
    fn matches(&self, byte: u8) -> bool {
        match self {
            Label::Epsilon => false,
            Label::Anchor => byte == ANCHOR_BYTE,
            Label::Bytes(set) => set.contains(byte),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub label: Label,
    pub target: StateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub edges: Vec<Edge>,
}

/// A sub-automaton with single entry and exit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub entry: StateId,
    pub exit: StateId,
}

impl Fragment {
    pub fn new(entry: StateId, exit: StateId) -> Self {
        Self { entry, exit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) states: Vec<State>,
    start: StateId,
    accept: StateId,
}

impl Nfa {
    /// Compile a syntax tree into an NFA.
    pub fn build(root: &Node) -> Nfa {
        let _span = tracing::debug_span!("nfa").entered();

        let mut nfa = Nfa {
            states: Vec::new(),
            start: 0,
            accept: 0,
        };
        let fragment = nfa.fragment(root);
        nfa.start = fragment.entry;
        nfa.accept = fragment.exit;
        nfa.route_anchors();

        tracing::debug!(states = nfa.states.len(), "built nfa");
        nfa
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &State {
        self.ensure_state(id)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Arena

    fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::default());
        id
    }

    fn connect(&mut self, from: StateId, label: Label, to: StateId) {
        self.ensure_state_mut(from).edges.push(Edge { label, target: to });
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.connect(from, Label::Epsilon, to);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fragment combinators

    fn fragment(&mut self, node: &Node) -> Fragment {
        match &node.kind {
            NodeKind::Empty => {
                let entry = self.add_state();
                let exit = self.add_state();
                self.epsilon(entry, exit);
                Fragment::new(entry, exit)
            }
            NodeKind::Anchor => {
                let entry = self.add_state();
                let exit = self.add_state();
                self.connect(entry, Label::Anchor, exit);
                Fragment::new(entry, exit)
            }
            NodeKind::Text(text) => {
                let entry = self.add_state();
                let exit = self.add_state();
                self.connect(entry, Label::Bytes(text.bytes()), exit);
                Fragment::new(entry, exit)
            }
            NodeKind::Concat(items) => {
                let fragments: Vec<Fragment> = items.iter().map(|n| self.fragment(n)).collect();
                self.sequence(&fragments)
            }
            NodeKind::Alternation(branches) => {
                let fragments: Vec<Fragment> = branches.iter().map(|n| self.fragment(n)).collect();
                self.alternation(&fragments)
            }
            NodeKind::Star(inner) => {
                let inner = self.fragment(inner);
                self.zero_or_more(inner)
            }
        }
    }

    /// Chain fragments: f1 → f2 → ... → fn
    fn sequence(&mut self, fragments: &[Fragment]) -> Fragment {
        let (Some(first), Some(last)) = (fragments.first(), fragments.last()) else {
            self.ensure_non_empty_concat()
        };
        for window in fragments.windows(2) {
            self.epsilon(window[0].exit, window[1].entry);
        }
        Fragment::new(first.entry, last.exit)
    }

    /// Fan out and back in: entry → [f1|f2|...|fn] → exit
    fn alternation(&mut self, fragments: &[Fragment]) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();
        for f in fragments {
            self.epsilon(entry, f.entry);
            self.epsilon(f.exit, exit);
        }
        Fragment::new(entry, exit)
    }

    /// Zero or more: inner*
    ///
    /// ```text
    ///          ┌──────────────┐
    ///          ↓              │
    /// entry ─→ branch ─→ inner ─┘
    ///            │
    ///            └─→ exit
    /// ```
    fn zero_or_more(&mut self, inner: Fragment) -> Fragment {
        let branch = self.add_state();
        let exit = self.add_state();
        self.epsilon(branch, inner.entry);
        self.epsilon(branch, exit);
        self.epsilon(inner.exit, branch);
        Fragment::new(branch, exit)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Anchors

    /// Make `\^` transitions usable at the start of input.
    ///
    /// A circuit fires the anchor on the sentinel byte at position 0. After
    /// that step the idle start state is off, so the anchor's landing state
    /// must also offer every move the start state offers; otherwise input
    /// that begins unanchored right after the sentinel could never match.
    ///
    /// Each anchor edge leaving the start closure is redirected to a fresh
    /// landing state that owns copies of the start's byte edges and falls
    /// through by epsilon to the original target. Anchors anywhere else stay
    /// as they are and can never fire.
    fn route_anchors(&mut self) {
        let start_closure = self.closure([self.start]);

        let mut start_moves: Vec<Edge> = Vec::new();
        let mut anchor_edges: Vec<(StateId, usize)> = Vec::new();
        for &s in &start_closure {
            for (i, edge) in self.ensure_state(s).edges.iter().enumerate() {
                match edge.label {
                    Label::Epsilon => {}
                    Label::Anchor => anchor_edges.push((s, i)),
                    Label::Bytes(_) => start_moves.push(*edge),
                }
            }
        }

        for (s, i) in anchor_edges {
            let target = self.ensure_state(s).edges[i].target;
            let landing = self.add_state();
            self.epsilon(landing, target);
            for moved in &start_moves {
                self.connect(landing, moved.label, moved.target);
            }
            self.ensure_state_mut(s).edges[i].target = landing;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries

    /// Epsilon-closure of a state set, sorted by id.
    pub fn closure(&self, seeds: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
        let mut seen: BTreeSet<StateId> = BTreeSet::new();
        let mut stack: Vec<StateId> = Vec::new();
        for s in seeds {
            if seen.insert(s) {
                stack.push(s);
            }
        }
        while let Some(s) = stack.pop() {
            for edge in &self.ensure_state(s).edges {
                if edge.label == Label::Epsilon && seen.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// States reachable from `states` by one `byte`, without closing over epsilons.
    pub fn step(&self, states: &[StateId], byte: u8) -> Vec<StateId> {
        let mut out: BTreeSet<StateId> = BTreeSet::new();
        for &s in states {
            for edge in &self.ensure_state(s).edges {
                if edge.label.matches(byte) {
                    out.insert(edge.target);
                }
            }
        }
        out.into_iter().collect()
    }

    /// Bytes on non-epsilon edges leaving `states`.
    pub fn symbols(&self, states: &[StateId]) -> ByteSet {
        let mut out = ByteSet::new();
        for &s in states {
            for edge in &self.ensure_state(s).edges {
                match edge.label {
                    Label::Epsilon => {}
                    Label::Anchor => out.insert(ANCHOR_BYTE),
                    Label::Bytes(set) => out = out.union(&set),
                }
            }
        }
        out
    }

    /// Whether the NFA accepts `input` read from its start state. An anchor
    /// consumes [`ANCHOR_BYTE`] like any other symbol here.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut current = self.closure([self.start]);
        for &b in input {
            current = self.closure(self.step(&current, b));
            if current.is_empty() {
                return false;
            }
        }
        current.contains(&self.accept)
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "start N{} accept N{}", self.start, self.accept)
            .expect("String write never fails");
        for (id, state) in self.states.iter().enumerate() {
            for edge in &state.edges {
                match edge.label {
                    Label::Epsilon => writeln!(out, "N{id}: ε → N{}", edge.target),
                    Label::Anchor => writeln!(out, "N{id}: \\^ → N{}", edge.target),
                    Label::Bytes(set) => writeln!(out, "N{id}: [{set}] → N{}", edge.target),
                }
                .expect("String write never fails");
            }
        }
        out
    }
}
