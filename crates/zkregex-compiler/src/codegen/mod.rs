//! Lowering a serialized [`Graph`] into a [`Circuit`] gate program.
//!
//! The gate program is target independent. [`crate::emit`] renders it as
//! circom source and the VM crate evaluates it directly.

mod config;
mod lower;

#[cfg(test)]
mod lower_tests;

pub use config::CircomConfig;
pub use lower::lower;

use serde::{Deserialize, Serialize};
use zkregex_core::GraphError;

/// How a reveal output picks the transitions whose bytes it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every transition entering this node.
    State(usize),
    /// Every transition carrying this capture-group tag.
    Tag(usize),
    /// Explicit `(from, to)` node pairs.
    Transitions(Vec<(usize, usize)>),
}

/// A revealed-byte output array of the generated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealGroup {
    /// Output signal name.
    pub name: String,
    pub selector: Selector,
}

impl RevealGroup {
    pub fn new(name: impl Into<String>, selector: Selector) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }

    pub fn state(name: impl Into<String>, state: usize) -> Self {
        Self::new(name, Selector::State(state))
    }

    pub fn tag(name: impl Into<String>, tag: usize) -> Self {
        Self::new(name, Selector::Tag(tag))
    }

    pub fn transitions(name: impl Into<String>, pairs: Vec<(usize, usize)>) -> Self {
        Self::new(name, Selector::Transitions(pairs))
    }
}

/// Reveal definitions in their JSON form: one list of `[from, to]` node
/// pairs per output, e.g. `{"transitions": [[[1, 3], [3, 3]]]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstringDefinitions {
    pub transitions: Vec<Vec<(usize, usize)>>,
}

impl SubstringDefinitions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// One group per list, named `reveal{k}` after its position.
    pub fn reveal_groups(&self) -> Vec<RevealGroup> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(k, pairs)| RevealGroup::transitions(format!("reveal{k}"), pairs.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("`{0}` is not a valid circom identifier")]
    InvalidIdentifier(String),
    #[error("reveal `{name}` selects node {state}, which is the start node or does not exist")]
    UnknownRevealState { name: String, state: usize },
    #[error("reveal `{name}` selects transition {from} → {to}, which does not exist")]
    UnknownTransition {
        name: String,
        from: usize,
        to: usize,
    },
    #[error("duplicate signal name `{0}`")]
    DuplicateSignal(String),
}

/// Whether `name` can be used as a circom template or signal name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
