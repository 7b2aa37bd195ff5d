use indoc::indoc;

use crate::{ANCHOR_BYTE, ByteSet, Graph, GraphEdge, GraphError, GraphNode, Symbol};

fn edge(chars: &[u8], target: usize) -> GraphEdge {
    GraphEdge::new(chars.iter().copied().collect(), target)
}

fn node(accept: bool, edges: Vec<GraphEdge>) -> GraphNode {
    GraphNode { accept, edges }
}

/// `a*b`
fn a_star_b() -> Graph {
    Graph::new(vec![
        node(false, vec![edge(b"a", 1), edge(b"b", 2)]),
        node(false, vec![edge(b"a", 1), edge(b"b", 2)]),
        node(true, vec![]),
    ])
}

/// `(\r\n|\^)x`, with the start edges copied onto the anchor target.
fn anchored_x() -> Graph {
    Graph::new(vec![
        node(false, vec![edge(b"\r", 1), edge(&[ANCHOR_BYTE], 2)]),
        node(false, vec![edge(b"\n", 2)]),
        node(false, vec![edge(b"\r", 1), edge(b"x", 3)]),
        node(true, vec![]),
    ])
}

#[test]
fn validates_well_formed_graph() {
    let g = a_star_b();
    assert_eq!(g.validate(), Ok(()));
    assert_eq!(g.accept_node(), Ok(2));
}

#[test]
fn rejects_accept_at_start() {
    let g = Graph::new(vec![node(true, vec![edge(b"a", 0)])]);
    assert_eq!(g.validate(), Err(GraphError::AcceptNodeAtStart));
    insta::assert_snapshot!(g.validate().unwrap_err(), @"accept node must not be 0");
}

#[test]
fn rejects_multiple_accepts() {
    let g = Graph::new(vec![
        node(false, vec![edge(b"a", 1)]),
        node(true, vec![edge(b"b", 2)]),
        node(true, vec![]),
    ]);
    insta::assert_snapshot!(g.validate().unwrap_err(), @"size of accept nodes must be one (found 2)");
}

#[test]
fn rejects_missing_accept() {
    let g = Graph::new(vec![node(false, vec![edge(b"a", 0)])]);
    assert_eq!(g.validate(), Err(GraphError::NoAcceptNode));
}

#[test]
fn rejects_overlapping_edges() {
    let g = Graph::new(vec![
        node(false, vec![edge(b"ab", 1), edge(b"bc", 2)]),
        node(true, vec![]),
        node(false, vec![]),
    ]);
    assert_eq!(
        g.validate(),
        Err(GraphError::Nondeterministic { node: 0, byte: b'b' })
    );
}

#[test]
fn rejects_dangling_edge() {
    let g = Graph::new(vec![node(false, vec![edge(b"a", 7)]), node(true, vec![])]);
    assert_eq!(
        g.validate(),
        Err(GraphError::DanglingEdge { from: 0, target: 7 })
    );
}

#[test]
fn full_match_consumes_everything() {
    let g = a_star_b();
    assert!(g.is_full_match(b"b"));
    assert!(g.is_full_match(b"aaab"));
    assert!(!g.is_full_match(b"ab c"));
    assert!(!g.is_full_match(b""));
    assert!(!g.is_full_match(b"ba"));
}

#[test]
fn find_is_leftmost_longest() {
    let g = a_star_b();
    let m = g.find(b"xxaab ab").unwrap();
    assert_eq!((m.start, m.end), (2, 5));
    assert_eq!(m.tags, vec![None, None, None]);
    assert!(g.find(b"xyz").is_none());
}

#[test]
fn anchor_only_fires_on_sentinel() {
    let g = anchored_x();
    assert_eq!(g.step(0, Symbol::Sentinel).map(|e| e.target), Some(2));
    assert!(g.step(0, Symbol::Byte(ANCHOR_BYTE)).is_none());
    assert!(g.step(1, Symbol::Sentinel).is_none());

    assert!(g.is_full_match(b"x"));
    assert!(g.is_full_match(b"\r\nx"));
    assert_eq!(g.find(b"ab\r\nx").map(|m| (m.start, m.end)), Some((2, 5)));
    assert!(g.find(b"ax").is_none());
}

#[test]
fn shortest_match_skips_sentinel() {
    assert_eq!(anchored_x().shortest_match_len(), Some(1));
    assert_eq!(a_star_b().shortest_match_len(), Some(1));

    let unreachable = Graph::new(vec![node(false, vec![edge(b"a", 0)]), node(true, vec![])]);
    assert_eq!(unreachable.shortest_match_len(), None);
}

#[test]
fn shortest_match_with_anchor_sharing_an_edge() {
    // `(\^|a)a*b`: the anchor and `a` lead to the same node.
    let mut chars = ByteSet::single(b'a');
    chars.insert(ANCHOR_BYTE);
    let g = Graph::new(vec![
        node(false, vec![GraphEdge::new(chars, 1)]),
        node(false, vec![edge(b"a", 1), edge(b"b", 2)]),
        node(true, vec![]),
    ]);
    assert_eq!(g.shortest_match_len(), Some(1));
    assert!(g.is_full_match(b"b"));
    assert!(g.is_full_match(b"ab"));
}

#[test]
fn anchor_byte_away_from_start_never_fires() {
    let g = Graph::new(vec![
        node(false, vec![edge(b"a", 1)]),
        node(false, vec![edge(&[ANCHOR_BYTE], 2)]),
        node(true, vec![]),
    ]);
    assert_eq!(g.shortest_match_len(), None);
    assert!(!g.is_full_match(b"a"));
    assert!(!g.is_full_match(&[b'a', ANCHOR_BYTE]));
}

#[test]
fn high_bytes_in_a_class_are_not_anchors() {
    // `[^;]` from the start node covers 0..=254 minus `;`.
    let class = ByteSet::range(0, 254).difference(&ByteSet::single(b';'));
    let g = Graph::new(vec![
        node(false, vec![GraphEdge::new(class, 1)]),
        node(false, vec![edge(b";", 2)]),
        node(true, vec![]),
    ]);
    assert_eq!(g.initial_state(), 0);
    assert!(!g.is_full_match(b";"));
    assert!(g.is_full_match(&[0x80, b';']));
    assert_eq!(g.shortest_match_len(), Some(2));
}

#[test]
fn json_shape() {
    let g = a_star_b();
    insta::assert_snapshot!(g.to_json(), @r#"[{"type":"","edges":{"[97]":1,"[98]":2}},{"type":"","edges":{"[97]":1,"[98]":2}},{"type":"accept","edges":{}}]"#);
    assert_eq!(Graph::from_json(&g.to_json()).unwrap(), g);
}

#[test]
fn json_keeps_tags() {
    let g = Graph::new(vec![
        node(false, vec![edge(b"ab", 1).tagged(0)]),
        node(true, vec![edge(b"c", 1).tagged(1)]),
    ]);
    let json = g.to_json();
    insta::assert_snapshot!(json, @r#"[{"type":"","edges":{"[97,98]":1},"tags":{"[97,98]":0}},{"type":"accept","edges":{"[99]":1},"tags":{"[99]":1}}]"#);
    assert_eq!(Graph::from_json(&json).unwrap(), g);
}

#[test]
fn json_rejects_bad_input() {
    let err = Graph::from_json(r#"[{"type":"final","edges":{}}]"#).unwrap_err();
    assert!(err.to_string().contains("unknown node type `final`"));

    let err = Graph::from_json(r#"[{"type":"","edges":{"[300]":0}}]"#).unwrap_err();
    assert!(err.to_string().contains("invalid edge key `[300]`"));
}

#[test]
fn json_is_validated() {
    let err = Graph::from_json(r#"[{"type":"","edges":{"[97]":5}},{"type":"accept","edges":{}}]"#)
        .unwrap_err();
    assert!(err.to_string().contains("edge from node 0 targets missing node 5"), "{err}");

    let err = Graph::from_json(r#"[{"type":"accept","edges":{"[97]":0}}]"#).unwrap_err();
    assert!(err.to_string().contains("accept node must not be 0"), "{err}");

    let err = Graph::from_json("[]").unwrap_err();
    assert!(err.to_string().contains("graph has no nodes"), "{err}");
}

#[test]
fn incoming_is_grouped_by_target() {
    let g = a_star_b();
    let rev = g.incoming();
    let sources: Vec<Vec<usize>> = rev
        .iter()
        .map(|edges| edges.iter().map(|(from, _)| *from).collect())
        .collect();
    assert_eq!(sources, vec![vec![], vec![0, 1], vec![0, 1]]);
}

#[test]
fn dump_lists_edges() {
    let g = anchored_x();
    insta::assert_snapshot!(g.dump(), @r"
    N0: [\x0d] → N1
    N0: [\xff] → N2
    N1: [\x0a] → N2
    N2: [\x0d] → N1
    N2: [x] → N3
    N3: accept
    ");
}

#[test]
fn dump_shows_tags() {
    let g = Graph::new(vec![
        node(false, vec![GraphEdge::new(ByteSet::range(b'a', b'z'), 1).tagged(3)]),
        node(true, vec![]),
    ]);
    assert_eq!(
        g.dump(),
        indoc! {"
            N0: [a-z] → N1 @3
            N1: accept
        "}
    );
}
