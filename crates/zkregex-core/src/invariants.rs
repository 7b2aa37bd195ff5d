//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{Graph, GraphNode};

impl Graph {
    pub(crate) fn ensure_node(&self, idx: usize) -> &GraphNode {
        self.nodes().get(idx).unwrap_or_else(|| {
            panic!(
                "Graph: node {idx} not found (graph has {} nodes; run validate() first)",
                self.len()
            )
        })
    }
}
