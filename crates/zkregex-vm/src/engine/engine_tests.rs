use zkregex_compiler::{CircomConfig, RevealGroup, build_circuit};
use zkregex_core::{Circuit, Op, Operand, RevealOutput, Wire};

use super::*;

/// `a*b`: `eq0 = in == b / and0 = s0 & eq0 / s1' = and0`
fn a_star_b() -> Circuit {
    Circuit {
        template_name: "AStarB".to_string(),
        regex: "a*b".to_string(),
        num_states: 2,
        accept_state: 1,
        ops: vec![
            Op::Eq { id: 0, value: b'b' },
            Op::And {
                id: 0,
                a: Wire::State(0),
                b: Wire::Eq(0),
            },
            Op::SetState {
                state: 1,
                from: Some(Wire::And(0)),
            },
        ],
        reveals: Vec::new(),
        check_input_range: true,
    }
}

#[test]
fn state_trace() {
    let witness = evaluate(&a_star_b(), b"ab").unwrap();
    insta::assert_snapshot!(witness.dump(), @r"
    0: s0
    1: s0
    2: s0
    3: s1
    ");
    assert!(witness.out);
    assert_eq!(witness.accepted_at(), vec![1]);
}

#[test]
fn rejects_without_accept() {
    let witness = evaluate(&a_star_b(), b"aaa").unwrap();
    assert!(!witness.out);
    assert!(witness.accepted_at().is_empty());
}

#[test]
fn range_check() {
    let err = evaluate(&a_star_b(), b"a\xffb").unwrap_err();
    assert_eq!(err, RuntimeError::ByteOutOfRange { position: 1, byte: 255 });
    insta::assert_snapshot!(err, @"message byte 255 at position 1 is not below 255");

    let mut unchecked = a_star_b();
    unchecked.check_input_range = false;
    assert!(evaluate(&unchecked, b"a\xffb").unwrap().out);
}

#[test]
fn padded_input() {
    let circuit = a_star_b();
    let vm = VM::new(&circuit).unwrap();

    let witness = vm.run_padded(b"ab", 8).unwrap();
    assert!(witness.out);
    assert_eq!(witness.states.len(), 10);

    assert_eq!(
        vm.run_padded(b"aaab", 3).unwrap_err(),
        RuntimeError::InputTooLong {
            len: 4,
            msg_bytes: 3
        }
    );
}

#[test]
fn reveal_only_runs_that_reach_accept() {
    let mut circuit = a_star_b();
    circuit.reveals.push(RevealOutput {
        name: "last".to_string(),
        transitions: vec![0],
    });
    let witness = evaluate(&circuit, b"xbyb").unwrap();
    let reveal = witness.reveal("last").unwrap();
    assert_eq!(reveal.bytes, vec![0, b'b', 0, b'b']);
    assert_eq!(reveal.runs(), vec![1..2, 3..4]);
    assert_eq!(reveal.revealed(), b"bb".to_vec());
    assert!(witness.reveal("missing").is_none());
}

#[test]
fn dead_run_is_not_revealed() {
    let circuit = build_circuit(
        "abc",
        "Abc",
        &[RevealGroup::state("reveal0", 2)],
        &CircomConfig::default(),
    )
    .unwrap();
    let witness = evaluate(&circuit, b"abxabc").unwrap();
    assert!(witness.out);
    let reveal = witness.reveal("reveal0").unwrap();
    assert_eq!(reveal.runs(), vec![4..5]);
}

#[test]
fn range_gates() {
    let circuit = Circuit {
        template_name: "Lower".to_string(),
        regex: "[a-z]".to_string(),
        num_states: 2,
        accept_state: 1,
        ops: vec![
            Op::LessEq {
                id: 0,
                lhs: Operand::Const(b'a'),
                rhs: Operand::Input,
            },
            Op::LessEq {
                id: 1,
                lhs: Operand::Input,
                rhs: Operand::Const(b'z'),
            },
            Op::And {
                id: 0,
                a: Wire::Lt(0),
                b: Wire::Lt(1),
            },
            Op::And {
                id: 1,
                a: Wire::State(0),
                b: Wire::And(0),
            },
            Op::SetState {
                state: 1,
                from: Some(Wire::And(1)),
            },
        ],
        reveals: Vec::new(),
        check_input_range: true,
    };
    assert!(evaluate(&circuit, b"Q q").unwrap().out);
    assert!(!evaluate(&circuit, b"Q{`").unwrap().out);
}

#[test]
fn or_gates_from_compiled_alternation() {
    let circuit = build_circuit("ab|ba", "AbBa", &[], &CircomConfig::default()).unwrap();
    assert!(circuit.counts().or > 0);
    assert!(evaluate(&circuit, b"xxba").unwrap().out);
    assert!(evaluate(&circuit, b"ab").unwrap().out);
    assert!(!evaluate(&circuit, b"aabb").unwrap().out);
}
