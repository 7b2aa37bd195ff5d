//! zkregex compiler: regular expressions to minimal DFAs and circom circuits.
//!
//! Pipeline stages:
//! - `parser` - logos lexer and recursive descent into the pattern AST
//! - `automata` - Thompson NFA, subset construction, Hopcroft minimization
//!   and serialization into a [`Graph`]
//! - `codegen` - lowering a graph into a [`Circuit`] gate program
//! - `emit` - circom source text for a circuit
//! - `decomposed` - chaining part graphs and extracting public substrings
//! - `diagnostics` - parse error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod automata;
pub mod codegen;
pub mod decomposed;
pub mod diagnostics;
pub mod emit;
mod invariants;
pub mod parser;

#[cfg(test)]
mod lib_tests;

pub use codegen::{CircomConfig, CodegenError, RevealGroup, Selector, SubstringDefinitions};
pub use decomposed::{ComposeError, ComposedRegex, ExtractError};
pub use diagnostics::{DiagnosticKind, Diagnostics};
pub use parser::{ParseError, ParseOptions};

use zkregex_core::{Circuit, DecomposedRegexConfig, Graph, GraphError};

/// Errors from any stage of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Malformed JSON descriptor (decomposed parts or reveal definitions),
    /// surfaced as serde reports it.
    #[error("{0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Report for humans. Parse errors come annotated against their pattern.
    pub fn render(&self) -> String {
        match self {
            Error::Parse(e) => e.render(),
            Error::Compose(e) => e.render(),
            other => other.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Compile `pattern` into its serialized minimal DFA.
pub fn compile(pattern: &str) -> Result<Graph> {
    compile_with(pattern, &ParseOptions::default())
}

pub fn compile_with(pattern: &str, options: &ParseOptions) -> Result<Graph> {
    let root = parser::parse_with(pattern, options)?;
    Ok(automata::build_graph(&root)?)
}

/// Compile `pattern` and lower it into a gate program named `template_name`.
pub fn build_circuit(
    pattern: &str,
    template_name: &str,
    reveals: &[RevealGroup],
    config: &CircomConfig,
) -> Result<Circuit> {
    let graph = compile(pattern)?;
    Ok(codegen::lower(&graph, template_name, pattern, reveals, config)?)
}

/// Circom template source for `pattern`.
pub fn gen_circom(
    pattern: &str,
    template_name: &str,
    reveals: &[RevealGroup],
    config: &CircomConfig,
) -> Result<String> {
    let circuit = build_circuit(pattern, template_name, reveals, config)?;
    Ok(emit::render(&circuit, config))
}

/// Gate program of a decomposed regex, with one reveal output per public part.
pub fn build_decomposed_circuit(
    decomposed: &DecomposedRegexConfig,
    template_name: &str,
    config: &CircomConfig,
) -> Result<Circuit> {
    let composed = decomposed::compose(decomposed)?;
    let reveals = composed.reveal_groups();
    Ok(codegen::lower(
        &composed.graph,
        template_name,
        &composed.regex,
        &reveals,
        config,
    )?)
}

/// Circom template source for a decomposed regex.
pub fn gen_from_decomposed(
    decomposed: &DecomposedRegexConfig,
    template_name: &str,
    config: &CircomConfig,
) -> Result<String> {
    let circuit = build_decomposed_circuit(decomposed, template_name, config)?;
    Ok(emit::render(&circuit, config))
}

/// Parse a JSON part descriptor (`{"parts": [...], "max_byte_size": ...}`).
pub fn decomposed_from_json(json: &str) -> Result<DecomposedRegexConfig> {
    Ok(DecomposedRegexConfig::from_json(json)?)
}

/// `[start, end)` of every public part of `decomposed` within `input`.
pub fn extract_substr_idxes(
    decomposed: &DecomposedRegexConfig,
    input: &str,
) -> Result<Vec<(usize, usize)>> {
    let composed = decomposed::compose(decomposed)?;
    Ok(decomposed::extract_substr_idxes(&composed, input)?)
}

pub fn extract_substrs(decomposed: &DecomposedRegexConfig, input: &str) -> Result<Vec<String>> {
    let composed = decomposed::compose(decomposed)?;
    Ok(decomposed::extract_substrs(&composed, input)?)
}
