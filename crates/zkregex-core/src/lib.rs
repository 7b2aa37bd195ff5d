#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the zkregex compiler and VM.
//!
//! - [`ByteSet`]: 256-bit membership set labeling automaton edges
//! - [`Graph`]: serialized minimal DFA, the hand-off format between the
//!   automaton pipeline and code generation (and companion tooling)
//! - [`Circuit`]: lowered gate program, rendered to circom text by the
//!   compiler and evaluated by the VM
//! - [`DecomposedRegexConfig`]: descriptors of a regex split into parts

mod byte_set;
mod circuit;
mod config;
mod graph;
mod invariants;
pub mod utils;

#[cfg(test)]
mod byte_set_tests;
#[cfg(test)]
mod graph_tests;

pub use byte_set::ByteSet;
pub use circuit::{Circuit, GateCounts, Op, Operand, RevealOutput, Wire};
pub use config::{DecomposedRegexConfig, RegexPart};
pub use graph::{Graph, GraphEdge, GraphError, GraphNode, Match, Symbol};

/// Value of the virtual byte prepended to every input buffer.
///
/// Message bytes must be strictly below it, so an anchor transition can only
/// ever match this position.
pub const INPUT_SENTINEL: u8 = 255;

/// Edge byte carrying a `\^` transition in automata and serialized graphs.
///
/// Anchors consume the sentinel. No other pattern syntax produces this byte:
/// negated brackets stop at 254 and UTF-8 text never contains it.
pub const ANCHOR_BYTE: u8 = INPUT_SENTINEL;

/// Index of the start (and idle) node in every serialized graph.
pub const START_NODE: usize = 0;
