//! Circuit evaluation engine.
//!
//! [`verify`] checks a gate program once for dangling wires, then [`VM`]
//! evaluates it position by position and assembles a [`Witness`].

mod error;
mod verify;
mod vm;
mod witness;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod verify_tests;

pub use error::RuntimeError;
pub use verify::verify;
pub use vm::{VM, evaluate};
pub use witness::{Reveal, Witness};
