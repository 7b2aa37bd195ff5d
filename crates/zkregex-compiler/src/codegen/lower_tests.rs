use zkregex_core::{ByteSet, Circuit, GateCounts, Graph, GraphEdge, GraphError, GraphNode};

use super::*;
use crate::automata::build_graph;
use crate::parser::parse;

fn graph(pattern: &str) -> Graph {
    build_graph(&parse(pattern).unwrap()).unwrap()
}

fn circuit(pattern: &str, reveals: &[RevealGroup]) -> Result<Circuit, CodegenError> {
    lower(&graph(pattern), "Test", pattern, reveals, &CircomConfig::default())
}

fn dump(pattern: &str) -> String {
    circuit(pattern, &[]).unwrap().dump()
}

#[test]
fn single_transition() {
    insta::assert_snapshot!(dump("a*b"), @r"
    eq0 = in == b
    and0 = s0 & eq0
    s1' = and0
    ");
}

#[test]
fn shared_equality_checks() {
    let circuit = circuit("ab|ba", &[]).unwrap();
    insta::assert_snapshot!(circuit.dump(), @r"
    eq0 = in == a
    and0 = s0 & eq0
    s1' = and0
    eq1 = in == b
    and1 = s0 & eq1
    s2' = and1
    and2 = s1 & eq1
    and3 = s2 & eq0
    or0 = and2 | and3
    s3' = or0
    ");
    assert_eq!(
        circuit.counts(),
        GateCounts {
            eq: 2,
            lt: 0,
            and: 4,
            or: 1
        }
    );
    assert_eq!(circuit.accept_state, 3);
    assert_eq!(circuit.num_states, 4);
}

#[test]
fn long_runs_become_range_checks() {
    insta::assert_snapshot!(dump("[a-z]x"), @r"
    lt0 = 97 <= in
    lt1 = in <= 122
    and0 = lt0 & lt1
    and1 = s0 & and0
    s1' = and1
    eq0 = in == x
    and2 = s1 & eq0
    s2' = and2
    ");
}

#[test]
fn range_threshold_is_configurable() {
    let config = CircomConfig::new().range_threshold(27);
    let circuit = lower(&graph("[a-z]x"), "Test", "", &[], &config).unwrap();
    let counts = circuit.counts();
    assert_eq!(counts.lt, 0);
    assert_eq!(counts.eq, 26);
    // `x` reuses the equality check built for `[a-z]`.
    let dump = circuit.dump();
    assert!(dump.contains("eq23 = in == x"), "{dump}");
    assert!(dump.contains("and1 = s1 & eq23"), "{dump}");
}

#[test]
fn anchor_inside_pattern_is_not_lowered() {
    let circuit = circuit(r"a\^b|c", &[]).unwrap();
    let dump = circuit.dump();
    assert!(!dump.contains(r"\xff"), "{dump}");
    assert!(dump.contains("' = 0"), "{dump}");
    assert_eq!(circuit.counts().eq, 3);
}

#[test]
fn anchor_matches_sentinel() {
    insta::assert_snapshot!(dump(r"\^a"), @r"
    eq0 = in == \xff
    and0 = s0 & eq0
    s1' = and0
    eq1 = in == a
    and1 = s1 & eq1
    s2' = and1
    ");
}

#[test]
fn lowering_is_deterministic() {
    let pattern = "([a-z]+=[^;]+; )+bh=";
    assert_eq!(dump(pattern), dump(pattern));
}

// ─────────────────────────────────────────────────────────────────────────
// Reveals

#[test]
fn reveal_by_state() {
    let circuit = circuit("ab|ba", &[RevealGroup::state("last", 3)]).unwrap();
    assert_eq!(circuit.reveals[0].transitions, vec![2, 3]);
    insta::assert_snapshot!(circuit.dump().lines().last().unwrap(), @"last <- and2 | and3");
}

#[test]
fn reveal_by_transitions() {
    let circuit = circuit("ab|ba", &[RevealGroup::transitions("r", vec![(1, 3), (0, 1)])]).unwrap();
    assert_eq!(circuit.reveals[0].transitions, vec![0, 2]);
}

#[test]
fn reveal_definitions_from_json() {
    let defs = SubstringDefinitions::from_json(r#"{"transitions": [[[1, 3], [0, 1]], [[2, 3]]]}"#).unwrap();
    let groups = defs.reveal_groups();
    assert_eq!(
        groups,
        vec![
            RevealGroup::transitions("reveal0", vec![(1, 3), (0, 1)]),
            RevealGroup::transitions("reveal1", vec![(2, 3)]),
        ]
    );

    let circuit = circuit("ab|ba", &groups).unwrap();
    insta::assert_snapshot!(circuit.dump().lines().rev().take(2).collect::<Vec<_>>().join("\n"), @r"
    reveal1 <- and3
    reveal0 <- and0 | and2
    ");

    let err = SubstringDefinitions::from_json("{}").unwrap_err();
    assert!(err.to_string().contains("missing field `transitions`"), "{err}");
}

#[test]
fn reveal_by_missing_tag_is_empty() {
    let circuit = circuit("ab|ba", &[RevealGroup::tag("r", 4)]).unwrap();
    assert!(circuit.reveals[0].transitions.is_empty());
}

#[test]
fn reveal_errors() {
    assert_eq!(
        circuit("ab|ba", &[RevealGroup::state("r", 0)]),
        Err(CodegenError::UnknownRevealState {
            name: "r".to_string(),
            state: 0
        })
    );
    let err = circuit("ab|ba", &[RevealGroup::transitions("r", vec![(0, 3)])]).unwrap_err();
    insta::assert_snapshot!(err, @"reveal `r` selects transition 0 → 3, which does not exist");
}

#[test]
fn names_must_be_identifiers() {
    let g = graph("ab");
    let config = CircomConfig::default();
    assert_eq!(
        lower(&g, "my-regex", "", &[], &config),
        Err(CodegenError::InvalidIdentifier("my-regex".to_string()))
    );
    assert_eq!(
        lower(&g, "Test", "", &[RevealGroup::state("out", 2)], &config),
        Err(CodegenError::DuplicateSignal("out".to_string()))
    );
    assert_eq!(
        lower(&g, "Test", "", &[RevealGroup::state("1x", 2)], &config),
        Err(CodegenError::InvalidIdentifier("1x".to_string()))
    );
    assert!(is_identifier("_reveal0"));
    assert!(!is_identifier(""));
}

#[test]
fn graph_errors_propagate() {
    let accept = GraphNode {
        accept: true,
        edges: vec![],
    };
    let start = GraphNode {
        accept: false,
        edges: vec![
            GraphEdge::new(ByteSet::single(b'a'), 1),
            GraphEdge::new(ByteSet::single(b'b'), 2),
        ],
    };
    let graph = Graph::new(vec![start, accept.clone(), accept]);
    let err = lower(&graph, "Test", "", &[], &CircomConfig::default()).unwrap_err();
    assert_eq!(err, CodegenError::Graph(GraphError::MultipleAcceptNodes(2)));
    assert_eq!(err.to_string(), "size of accept nodes must be one (found 2)");
}
