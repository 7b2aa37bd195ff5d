//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::automata::nfa::{Nfa, State, StateId};

impl Nfa {
    #[inline]
    pub(crate) fn ensure_state(&self, id: StateId) -> &State {
        let len = self.len();
        self.states.get(id as usize).unwrap_or_else(|| {
            panic!("Nfa: state {id} not found (nfa has {len} states)")
        })
    }

    #[inline]
    pub(crate) fn ensure_state_mut(&mut self, id: StateId) -> &mut State {
        let len = self.len();
        self.states.get_mut(id as usize).unwrap_or_else(|| {
            panic!("Nfa: state {id} not found (nfa has {len} states)")
        })
    }

    #[inline]
    pub(crate) fn ensure_non_empty_concat(&self) -> ! {
        panic!("Nfa: concatenation without items (parser collapses empty sequences)")
    }
}
