//! Automaton pipeline: syntax tree → NFA → DFA → minimal DFA → [`Graph`].
//!
//! Each stage is its own arena of plain records referencing other states by
//! index, converted into the next stage by an explicit constructor.

pub mod dfa;
pub mod minimize;
pub mod nfa;
pub mod serialize;


pub use dfa::{Dfa, DfaId, DfaState};
pub use minimize::{MinDfa, MinDfaState};
pub use nfa::{Nfa, StateId};
pub use serialize::serialize;

use zkregex_core::{Graph, GraphError};

use crate::parser::Node;

/// Run every automaton stage over a parsed pattern.
pub fn build_graph(root: &Node) -> Result<Graph, GraphError> {
    let nfa = Nfa::build(root);
    let dfa = Dfa::determinize(&nfa);
    let min = MinDfa::minimize(&dfa);
    serialize(&min)
}
