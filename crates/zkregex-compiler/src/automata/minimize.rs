//! Hopcroft partition refinement.
//!
//! Partitions are sorted vectors of DFA ids, which doubles as their identity
//! in the worklist. The start state's partition always becomes state 0 of
//! the minimal DFA.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt::Write;

use indexmap::IndexSet;
use zkregex_core::ByteSet;
use zkregex_core::utils::to_alpha;

use super::dfa::{Dfa, DfaId};

/// Predecessors of every DFA state, per symbol.
pub type ReverseEdges = Vec<BTreeMap<u8, Vec<DfaId>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinDfaState {
    /// Alphabetic id, `A` for the start state.
    pub label: String,
    /// DFA states merged into this one.
    pub members: Vec<DfaId>,
    /// Outgoing edges keyed by target, each labeled with all of its bytes.
    pub edges: BTreeMap<usize, ByteSet>,
    pub accept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinDfa {
    states: Vec<MinDfaState>,
}

impl MinDfa {
    pub fn minimize(dfa: &Dfa) -> MinDfa {
        let _span = tracing::debug_span!("minimize", dfa_states = dfa.len()).entered();

        let reverse = reverse_edges(dfa);
        let mut partitions = refine(dfa, &reverse);

        partitions.sort();
        if let Some(pos) = partitions.iter().position(|p| p.contains(&0)) {
            partitions.swap(0, pos);
        }

        let mut group_of = vec![0usize; dfa.len()];
        for (g, members) in partitions.iter().enumerate() {
            for &m in members {
                group_of[m] = g;
            }
        }

        let mut states: Vec<MinDfaState> = partitions
            .into_iter()
            .enumerate()
            .map(|(g, members)| MinDfaState {
                label: to_alpha(g),
                accept: members.iter().any(|&m| dfa.states()[m].accept),
                members,
                edges: BTreeMap::new(),
            })
            .collect();

        for (target, by_symbol) in reverse.iter().enumerate() {
            for (&symbol, sources) in by_symbol {
                for &source in sources {
                    states[group_of[source]]
                        .edges
                        .entry(group_of[target])
                        .or_default()
                        .insert(symbol);
                }
            }
        }

        tracing::debug!(states = states.len(), "minimized dfa");
        MinDfa { states }
    }

    pub fn states(&self) -> &[MinDfaState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn next(&self, state: usize, byte: u8) -> Option<usize> {
        self.states
            .get(state)?
            .edges
            .iter()
            .find(|(_, set)| set.contains(byte))
            .map(|(&target, _)| target)
    }

    /// Whether the minimal DFA accepts `input` read from its start state.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut current = 0;
        for &b in input {
            match self.next(current, b) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.states.get(current).is_some_and(|s| s.accept)
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        for state in &self.states {
            let members: Vec<String> = state.members.iter().map(|&m| to_alpha(m)).collect();
            write!(out, "{} = {{{}}}", state.label, members.join(","))
                .expect("String write never fails");
            if state.accept {
                out.push_str(" accept");
            }
            out.push('\n');
            for (&target, set) in &state.edges {
                writeln!(out, "  [{set}] → {}", self.states[target].label)
                    .expect("String write never fails");
            }
        }
        out
    }
}

/// Reverse index built by breadth-first traversal from the start state.
pub fn reverse_edges(dfa: &Dfa) -> ReverseEdges {
    let mut reverse: ReverseEdges = vec![BTreeMap::new(); dfa.len()];
    if dfa.is_empty() {
        return reverse;
    }

    let mut seen = vec![false; dfa.len()];
    let mut queue = VecDeque::from([0]);
    seen[0] = true;
    while let Some(id) = queue.pop_front() {
        for (&symbol, &target) in &dfa.states()[id].trans {
            reverse[target].entry(symbol).or_default().push(id);
            if !seen[target] {
                seen[target] = true;
                queue.push_back(target);
            }
        }
    }
    reverse
}

/// Coarsest partition compatible with acceptance and transitions.
fn refine(dfa: &Dfa, reverse: &ReverseEdges) -> Vec<Vec<DfaId>> {
    let (accepting, rejecting): (Vec<DfaId>, Vec<DfaId>) =
        (0..dfa.len()).partition(|&id| dfa.states()[id].accept);

    let mut partitions: IndexSet<Vec<DfaId>> = IndexSet::new();
    let mut queue: VecDeque<Vec<DfaId>> = VecDeque::new();
    let mut queued: HashSet<Vec<DfaId>> = HashSet::new();
    for group in [accepting, rejecting] {
        if !group.is_empty() {
            partitions.insert(group.clone());
            queued.insert(group.clone());
            queue.push_back(group);
        }
    }

    while let Some(splitter) = queue.pop_front() {
        // Entries whose group was split after queueing were replaced by both halves.
        if !queued.remove(&splitter) {
            continue;
        }

        let mut predecessors: BTreeMap<u8, BTreeSet<DfaId>> = BTreeMap::new();
        for &target in &splitter {
            for (&symbol, sources) in &reverse[target] {
                predecessors.entry(symbol).or_default().extend(sources);
            }
        }

        for preds in predecessors.values() {
            let groups: Vec<Vec<DfaId>> = partitions.iter().cloned().collect();
            for group in groups {
                let (inside, outside): (Vec<DfaId>, Vec<DfaId>) =
                    group.iter().partition(|id| preds.contains(id));
                if inside.is_empty() || outside.is_empty() {
                    continue;
                }

                partitions.shift_remove(&group);
                partitions.insert(inside.clone());
                partitions.insert(outside.clone());

                if queued.remove(&group) {
                    for half in [inside, outside] {
                        queued.insert(half.clone());
                        queue.push_back(half);
                    }
                } else {
                    let smaller = if inside.len() <= outside.len() {
                        inside
                    } else {
                        outside
                    };
                    queued.insert(smaller.clone());
                    queue.push_back(smaller);
                }
            }
        }
    }

    partitions.into_iter().collect()
}
