//! Regexes decomposed into sequential parts.
//!
//! Each part compiles to its own graph. The graphs are chained: the start
//! node of part k+1 is merged into the accept node of part k, and every edge
//! is tagged with the index of the part it came from. Public parts become
//! reveal outputs selected by their tag.

mod extract;


pub use extract::{ExtractError, extract_substr_idxes, extract_substrs};

use zkregex_core::{
    ANCHOR_BYTE, ByteSet, DecomposedRegexConfig, Graph, GraphEdge, GraphError, GraphNode,
    START_NODE,
};

use crate::automata::build_graph;
use crate::codegen::RevealGroup;
use crate::parser::{ParseError, parse};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("decomposed regex has no parts")]
    NoParts,
    #[error("{source}")]
    Parse { index: usize, source: ParseError },
    #[error("{source}")]
    PartGraph { index: usize, source: GraphError },
    #[error("part {index} uses `\\^`, which is only allowed in the first part")]
    AnchorOutsideFirstPart { index: usize },
    #[error("part {index} cannot match within {max_length} bytes (shortest match is {shortest})")]
    PartTooLong {
        index: usize,
        max_length: usize,
        shortest: usize,
    },
    #[error("pattern cannot match within {max_byte_size} bytes (shortest match is {shortest})")]
    ExceedsMaxByteSize { max_byte_size: usize, shortest: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ComposeError {
    /// Index of the part the error comes from, if it is specific to one.
    pub fn part(&self) -> Option<usize> {
        match self {
            ComposeError::Parse { index, .. }
            | ComposeError::PartGraph { index, .. }
            | ComposeError::AnchorOutsideFirstPart { index }
            | ComposeError::PartTooLong { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Like `Display`, but parse errors are annotated against the part's
    /// pattern and labeled with its index.
    pub fn render(&self) -> String {
        match self {
            ComposeError::Parse { index, source } => {
                let name = format!("part {index}");
                source.diagnostics.printer(&source.pattern).name(&name).render()
            }
            other => other.to_string(),
        }
    }
}

/// The chained graph of a decomposed regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRegex {
    pub graph: Graph,
    /// All parts concatenated, for display.
    pub regex: String,
    /// Indices of the public parts, in order.
    pub public_parts: Vec<usize>,
    pub max_byte_size: Option<usize>,
}

impl ComposedRegex {
    /// One reveal output per public part, named `reveal{k}` after the part index.
    pub fn reveal_groups(&self) -> Vec<RevealGroup> {
        self.public_parts
            .iter()
            .map(|&k| RevealGroup::tag(format!("reveal{k}"), k))
            .collect()
    }
}

pub fn compose(config: &DecomposedRegexConfig) -> Result<ComposedRegex, ComposeError> {
    let _span = tracing::debug_span!("compose", parts = config.parts.len()).entered();

    if config.parts.is_empty() {
        return Err(ComposeError::NoParts);
    }

    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut accept = START_NODE;

    for (index, part) in config.parts.iter().enumerate() {
        let root = parse(&part.regex_def).map_err(|source| ComposeError::Parse { index, source })?;
        let graph = build_graph(&root).map_err(|source| ComposeError::PartGraph { index, source })?;

        if let Some(max_length) = part.max_length {
            let shortest = graph.shortest_match_len().unwrap_or(usize::MAX);
            if shortest > max_length {
                return Err(ComposeError::PartTooLong {
                    index,
                    max_length,
                    shortest,
                });
            }
        }

        accept = if index == 0 {
            append_first(&mut nodes, &graph)?
        } else {
            append_chained(&mut nodes, &graph, index, accept)?
        };
    }

    let graph = Graph::new(nodes);
    graph.validate()?;

    if let Some(max_byte_size) = config.max_byte_size {
        let shortest = graph.shortest_match_len().unwrap_or(usize::MAX);
        if shortest > max_byte_size {
            return Err(ComposeError::ExceedsMaxByteSize {
                max_byte_size,
                shortest,
            });
        }
    }

    tracing::debug!(nodes = graph.len(), accept, "composed graph");
    Ok(ComposedRegex {
        graph,
        regex: config.concatenated(),
        public_parts: config.public_parts().collect(),
        max_byte_size: config.max_byte_size,
    })
}

/// Copy the first part's graph, tagging every edge with part 0.
fn append_first(nodes: &mut Vec<GraphNode>, graph: &Graph) -> Result<usize, ComposeError> {
    for node in graph.nodes() {
        nodes.push(GraphNode {
            accept: node.accept,
            edges: node
                .edges
                .iter()
                .map(|e| GraphEdge::new(e.chars, e.target).tagged(0))
                .collect(),
        });
    }
    Ok(graph.accept_node()?)
}

/// Append part `index`, whose start node becomes the current accept node.
///
/// Where both the old accept node and the new start node handle a byte, the
/// new part wins. The merged node no longer accepts.
fn append_chained(
    nodes: &mut Vec<GraphNode>,
    graph: &Graph,
    index: usize,
    accept: usize,
) -> Result<usize, ComposeError> {
    let start = graph.node(START_NODE);
    if start.edges.iter().any(|e| e.chars.contains(ANCHOR_BYTE)) {
        return Err(ComposeError::AnchorOutsideFirstPart { index });
    }

    let base = nodes.len();
    let place = |local: usize| if local == START_NODE { accept } else { base + local - 1 };
    let relocate = |edge: &GraphEdge| GraphEdge::new(edge.chars, place(edge.target)).tagged(index);

    let incoming: Vec<GraphEdge> = start.edges.iter().map(relocate).collect();
    let covered = incoming
        .iter()
        .fold(ByteSet::new(), |acc, e| acc.union(&e.chars));

    let merged = &mut nodes[accept];
    merged.accept = false;
    merged.edges.retain_mut(|edge| {
        edge.chars = edge.chars.difference(&covered);
        !edge.chars.is_empty()
    });
    merged.edges.extend(incoming);

    for node in &graph.nodes()[1..] {
        nodes.push(GraphNode {
            accept: node.accept,
            edges: node.edges.iter().map(relocate).collect(),
        });
    }
    Ok(place(graph.accept_node()?))
}
