//! Minimal DFA → serialized [`Graph`].

use zkregex_core::utils::to_nature;
use zkregex_core::{Graph, GraphEdge, GraphError, GraphNode};

use super::minimize::{MinDfa, MinDfaState};

/// Number the states by label rank and emit one edge per (state, target).
///
/// The result is validated, so a pattern whose minimal DFA has several
/// accepting states (or accepts at the start) is rejected here.
pub fn serialize(dfa: &MinDfa) -> Result<Graph, GraphError> {
    let _span = tracing::debug_span!("serialize", states = dfa.len()).entered();

    let mut ranked: Vec<(usize, &MinDfaState)> = dfa.states().iter().enumerate().collect();
    ranked.sort_by_key(|(idx, state)| to_nature(&state.label).unwrap_or(idx + 1));

    let mut position = vec![0usize; ranked.len()];
    for (pos, (idx, _)) in ranked.iter().enumerate() {
        position[*idx] = pos;
    }

    let nodes: Vec<GraphNode> = ranked
        .iter()
        .map(|(_, state)| GraphNode {
            accept: state.accept,
            edges: state
                .edges
                .iter()
                .map(|(&target, &chars)| GraphEdge::new(chars, position[target]))
                .collect(),
        })
        .collect();

    let graph = Graph::new(nodes);
    graph.validate()?;
    tracing::debug!(nodes = graph.len(), "serialized graph");
    Ok(graph)
}
