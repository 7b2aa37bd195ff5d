//! Subset construction.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Write;

use zkregex_core::ByteSet;
use zkregex_core::utils::to_alpha;

use super::nfa::{Nfa, StateId};

/// Index into `Dfa::states`; 0 is the start state.
pub type DfaId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    /// Member NFA states, sorted by id. Identity of this state.
    pub key: Vec<StateId>,
    /// Outgoing symbols in ascending order.
    pub symbols: Vec<u8>,
    pub trans: BTreeMap<u8, DfaId>,
    pub accept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    /// Breadth-first subset construction from the epsilon-closure of the NFA start.
    pub fn determinize(nfa: &Nfa) -> Dfa {
        let _span = tracing::debug_span!("determinize", nfa_states = nfa.len()).entered();

        let mut states: Vec<DfaState> = Vec::new();
        let mut index: HashMap<Vec<StateId>, DfaId> = HashMap::new();
        let mut queue: VecDeque<DfaId> = VecDeque::new();

        let start = nfa.closure([nfa.start()]);
        index.insert(start.clone(), 0);
        states.push(new_state(nfa, start));
        queue.push_back(0);

        while let Some(id) = queue.pop_front() {
            let members = states[id].key.clone();
            let symbols = nfa.symbols(&members);
            let mut trans = BTreeMap::new();

            for symbol in symbols.iter() {
                let closed = nfa.closure(nfa.step(&members, symbol));
                let target = match index.get(&closed) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = states.len();
                        index.insert(closed.clone(), fresh);
                        states.push(new_state(nfa, closed));
                        queue.push_back(fresh);
                        fresh
                    }
                };
                trans.insert(symbol, target);
            }

            let state = &mut states[id];
            state.symbols = symbols.iter().collect();
            state.trans = trans;
        }

        tracing::debug!(states = states.len(), "built dfa");
        Dfa { states }
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether the DFA accepts `input` read from its start state.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut current: DfaId = 0;
        for b in input {
            match self.states.get(current).and_then(|s| s.trans.get(b)) {
                Some(&next) => current = next,
                None => return false,
            }
        }
        self.states.get(current).is_some_and(|s| s.accept)
    }

    /// One line per (state, target) pair, states named `A`, `B`, ...
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (id, state) in self.states.iter().enumerate() {
            if state.accept {
                writeln!(out, "{}: accept", to_alpha(id)).expect("String write never fails");
            }
            let mut by_target: BTreeMap<DfaId, ByteSet> = BTreeMap::new();
            for (&symbol, &target) in &state.trans {
                by_target.entry(target).or_default().insert(symbol);
            }
            for (target, set) in by_target {
                writeln!(out, "{}: [{set}] → {}", to_alpha(id), to_alpha(target))
                    .expect("String write never fails");
            }
        }
        out
    }
}

fn new_state(nfa: &Nfa, key: Vec<StateId>) -> DfaState {
    let accept = key.contains(&nfa.accept());
    DfaState {
        key,
        symbols: Vec::new(),
        trans: BTreeMap::new(),
        accept,
    }
}
