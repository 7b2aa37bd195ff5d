//! Structural checks on a gate program before evaluation.
//!
//! A program is well formed when every wire is written before it is read,
//! no component id is written twice, and every non-idle state is assigned
//! exactly once. Evaluation indexes its value tables directly and relies on
//! these properties.

use zkregex_core::{Circuit, Op, START_NODE, Wire};

use super::RuntimeError;

/// Which component ids have been written so far.
#[derive(Debug, Default)]
struct Defined {
    eq: Vec<bool>,
    lt: Vec<bool>,
    and: Vec<bool>,
    or: Vec<bool>,
}

impl Defined {
    fn slot(&mut self, wire: Wire) -> Option<&mut Vec<bool>> {
        match wire {
            Wire::Eq(_) => Some(&mut self.eq),
            Wire::Lt(_) => Some(&mut self.lt),
            Wire::And(_) => Some(&mut self.and),
            Wire::Or(_) => Some(&mut self.or),
            Wire::State(_) => None,
        }
    }

    fn is_defined(&mut self, wire: Wire) -> bool {
        let id = wire_id(wire);
        self.slot(wire)
            .is_some_and(|slots| slots.get(id).copied().unwrap_or(false))
    }

    /// Mark `wire` as written. Returns false if it already was.
    fn define(&mut self, wire: Wire) -> bool {
        let id = wire_id(wire);
        let Some(slots) = self.slot(wire) else {
            return false;
        };
        if slots.len() <= id {
            slots.resize(id + 1, false);
        }
        !std::mem::replace(&mut slots[id], true)
    }
}

fn wire_id(wire: Wire) -> usize {
    match wire {
        Wire::Eq(id) | Wire::Lt(id) | Wire::And(id) | Wire::Or(id) | Wire::State(id) => id,
    }
}

/// The wire an op writes, if it is a gate.
fn output(op: &Op) -> Option<Wire> {
    match op {
        Op::Eq { id, .. } => Some(Wire::Eq(*id)),
        Op::LessEq { id, .. } => Some(Wire::Lt(*id)),
        Op::And { id, .. } => Some(Wire::And(*id)),
        Op::Or { id, .. } => Some(Wire::Or(*id)),
        Op::SetState { .. } => None,
    }
}

fn inputs(op: &Op) -> Vec<Wire> {
    match op {
        Op::Eq { .. } | Op::LessEq { .. } => Vec::new(),
        Op::And { a, b, .. } => vec![*a, *b],
        Op::Or { inputs, .. } => inputs.clone(),
        Op::SetState { from, .. } => from.iter().copied().collect(),
    }
}

pub fn verify(circuit: &Circuit) -> Result<(), RuntimeError> {
    let n = circuit.num_states;
    let malformed = |op: usize, reason: String| RuntimeError::MalformedCircuit { op, reason };

    if circuit.accept_state == START_NODE || circuit.accept_state >= n {
        return Err(malformed(
            0,
            format!("accept state {} is not a state in 1..{n}", circuit.accept_state),
        ));
    }

    let mut defined = Defined::default();
    let mut assigned = vec![false; n];

    for (idx, op) in circuit.ops.iter().enumerate() {
        for wire in inputs(op) {
            let ok = match wire {
                Wire::State(s) => s < n,
                gate => defined.is_defined(gate),
            };
            if !ok {
                return Err(malformed(idx, format!("reads {wire} before it is written")));
            }
        }

        if let Op::Or { inputs, .. } = op {
            if inputs.is_empty() {
                return Err(malformed(idx, "OR gate has no inputs".to_string()));
            }
        }

        if let Some(wire) = output(op) {
            if !defined.define(wire) {
                return Err(malformed(idx, format!("{wire} is written twice")));
            }
        }

        if let Op::SetState { state, .. } = op {
            if *state == START_NODE || *state >= n {
                return Err(malformed(idx, format!("assigns state {state} outside 1..{n}")));
            }
            if std::mem::replace(&mut assigned[*state], true) {
                return Err(malformed(idx, format!("state {state} is assigned twice")));
            }
        }
    }

    if let Some(state) = (1..n).find(|&s| !assigned[s]) {
        return Err(malformed(
            circuit.ops.len(),
            format!("state {state} is never assigned"),
        ));
    }

    for reveal in &circuit.reveals {
        if let Some(&gate) = reveal
            .transitions
            .iter()
            .find(|&&g| !defined.is_defined(Wire::And(g)))
        {
            return Err(RuntimeError::MalformedReveal {
                name: reveal.name.clone(),
                gate,
            });
        }
    }

    Ok(())
}
