use zkregex_core::{Circuit, Op, RevealOutput, Wire};

use super::*;

fn circuit(num_states: usize, ops: Vec<Op>) -> Circuit {
    Circuit {
        template_name: "T".to_string(),
        regex: String::new(),
        num_states,
        accept_state: 1,
        ops,
        reveals: Vec::new(),
        check_input_range: true,
    }
}

fn detect_b() -> Vec<Op> {
    vec![
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
    ]
}

#[test]
fn well_formed() {
    assert_eq!(verify(&circuit(2, detect_b())), Ok(()));
}

#[test]
fn read_before_write() {
    let mut ops = detect_b();
    ops.swap(0, 1);
    insta::assert_snapshot!(
        verify(&circuit(2, ops)).unwrap_err(),
        @"op 0: reads eq0 before it is written"
    );
}

#[test]
fn gate_written_twice() {
    let mut ops = detect_b();
    ops.insert(1, Op::Eq { id: 0, value: b'c' });
    insta::assert_snapshot!(
        verify(&circuit(2, ops)).unwrap_err(),
        @"op 1: eq0 is written twice"
    );
}

#[test]
fn state_assignment() {
    insta::assert_snapshot!(
        verify(&circuit(3, detect_b())).unwrap_err(),
        @"op 3: state 2 is never assigned"
    );

    let mut ops = detect_b();
    ops.push(Op::SetState { state: 1, from: None });
    insta::assert_snapshot!(
        verify(&circuit(2, ops)).unwrap_err(),
        @"op 3: state 1 is assigned twice"
    );

    let mut ops = detect_b();
    ops.push(Op::SetState { state: 0, from: None });
    insta::assert_snapshot!(
        verify(&circuit(2, ops)).unwrap_err(),
        @"op 3: assigns state 0 outside 1..2"
    );
}

#[test]
fn accept_state_bounds() {
    let mut bad = circuit(2, detect_b());
    bad.accept_state = 0;
    insta::assert_snapshot!(verify(&bad).unwrap_err(), @"op 0: accept state 0 is not a state in 1..2");
}

#[test]
fn empty_or() {
    let mut ops = detect_b();
    ops.insert(0, Op::Or { id: 0, inputs: Vec::new() });
    insta::assert_snapshot!(
        verify(&circuit(2, ops)).unwrap_err(),
        @"op 0: OR gate has no inputs"
    );
}

#[test]
fn reveal_gate_must_exist() {
    let mut bad = circuit(2, detect_b());
    bad.reveals.push(RevealOutput {
        name: "r".to_string(),
        transitions: vec![0, 5],
    });
    assert_eq!(
        verify(&bad),
        Err(RuntimeError::MalformedReveal {
            name: "r".to_string(),
            gate: 5
        })
    );
    assert!(VM::new(&bad).is_err());
}
