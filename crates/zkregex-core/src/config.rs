//! Descriptors of a regex decomposed into sequential parts.

use serde::{Deserialize, Serialize};

/// One sub-pattern of a decomposed regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexPart {
    /// Public parts get a revealed-byte output in the generated circuit.
    pub is_public: bool,
    pub regex_def: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Upper bound on the bytes this part may span in a match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl RegexPart {
    pub fn new(is_public: bool, regex_def: impl Into<String>) -> Self {
        Self {
            is_public,
            regex_def: regex_def.into(),
            name: None,
            max_length: None,
        }
    }

    pub fn public(regex_def: impl Into<String>) -> Self {
        Self::new(true, regex_def)
    }

    pub fn private(regex_def: impl Into<String>) -> Self {
        Self::new(false, regex_def)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedRegexConfig {
    pub parts: Vec<RegexPart>,
    /// Maximum input length the composite pattern must be able to match within.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_byte_size: Option<usize>,
}

impl DecomposedRegexConfig {
    pub fn new(parts: Vec<RegexPart>) -> Self {
        Self {
            parts,
            max_byte_size: None,
        }
    }

    pub fn max_byte_size(mut self, max: usize) -> Self {
        self.max_byte_size = Some(max);
        self
    }

    /// Parse the JSON descriptor. Missing required fields are reported verbatim
    /// by serde, e.g. "missing field `parts`".
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The full pattern the parts spell out when concatenated.
    pub fn concatenated(&self) -> String {
        self.parts.iter().map(|p| p.regex_def.as_str()).collect()
    }

    /// Indices of the public parts, in order.
    pub fn public_parts(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_public)
            .map(|(i, _)| i)
    }
}
