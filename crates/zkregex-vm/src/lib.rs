//! Reference evaluator for zkregex circuits.
//!
//! Runs a lowered [`zkregex_core::Circuit`] over a concrete message the way
//! the generated circom template would, producing every witness-level value:
//! the accept output, the state bits at each position and the reveal arrays.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{Reveal, RuntimeError, VM, Witness, evaluate, verify};
