//! Evaluation of a gate program over a message.

use std::iter;

use zkregex_core::utils::pad_bytes;
use zkregex_core::{Circuit, GateCounts, INPUT_SENTINEL, Op, Operand, START_NODE, Wire};

use super::verify::verify;
use super::witness::{Reveal, Witness};
use super::RuntimeError;

/// Gate values at one input position.
#[derive(Debug)]
struct Step {
    eq: Vec<bool>,
    lt: Vec<bool>,
    and: Vec<bool>,
    or: Vec<bool>,
}

impl Step {
    fn new(counts: GateCounts) -> Self {
        Self {
            eq: vec![false; counts.eq],
            lt: vec![false; counts.lt],
            and: vec![false; counts.and],
            or: vec![false; counts.or],
        }
    }

    fn get(&self, wire: Wire, prev: &[bool]) -> bool {
        match wire {
            Wire::Eq(id) => self.eq[id],
            Wire::Lt(id) => self.lt[id],
            Wire::And(id) => self.and[id],
            Wire::Or(id) => self.or[id],
            Wire::State(s) => prev[s],
        }
    }
}

fn operand(op: Operand, byte: u8) -> u8 {
    match op {
        Operand::Input => byte,
        Operand::Const(value) => value,
    }
}

/// Evaluator bound to one verified circuit.
#[derive(Debug)]
pub struct VM<'c> {
    circuit: &'c Circuit,
    counts: GateCounts,
}

impl<'c> VM<'c> {
    pub fn new(circuit: &'c Circuit) -> Result<Self, RuntimeError> {
        verify(circuit)?;
        Ok(Self {
            circuit,
            counts: circuit.counts(),
        })
    }

    /// Evaluate over `msg` as the template instantiated with `msg_bytes = msg.len()`.
    pub fn run(&self, msg: &[u8]) -> Result<Witness, RuntimeError> {
        let circuit = self.circuit;
        let _span =
            tracing::debug_span!("evaluate", template = %circuit.template_name, len = msg.len())
                .entered();

        if circuit.check_input_range {
            if let Some(position) = msg.iter().position(|&b| b >= INPUT_SENTINEL) {
                return Err(RuntimeError::ByteOutOfRange {
                    position,
                    byte: msg[position],
                });
            }
        }

        let input: Vec<u8> = iter::once(INPUT_SENTINEL).chain(msg.iter().copied()).collect();
        let num_bytes = input.len();
        let accept = circuit.accept_state;

        let mut states = vec![vec![false; circuit.num_states]; num_bytes + 1];
        states[0][START_NODE] = true;
        let mut changed = Vec::with_capacity(num_bytes);
        let mut and_gates = Vec::with_capacity(num_bytes);

        for (i, &byte) in input.iter().enumerate() {
            let prev = &states[i];
            let mut step = Step::new(self.counts);
            let mut next = vec![false; circuit.num_states];

            for op in &circuit.ops {
                match op {
                    Op::Eq { id, value } => step.eq[*id] = byte == *value,
                    Op::LessEq { id, lhs, rhs } => {
                        step.lt[*id] = operand(*lhs, byte) <= operand(*rhs, byte);
                    }
                    Op::And { id, a, b } => {
                        let value = step.get(*a, prev) && step.get(*b, prev);
                        step.and[*id] = value;
                    }
                    Op::Or { id, inputs } => {
                        let value = inputs.iter().any(|w| step.get(*w, prev));
                        step.or[*id] = value;
                    }
                    Op::SetState { state, from } => {
                        next[*state] = from.is_some_and(|w| step.get(w, prev));
                    }
                }
            }

            let any = next[1..].iter().any(|&bit| bit);
            next[START_NODE] = !any;
            changed.push(any);
            and_gates.push(step.and);
            states[i + 1] = next;
        }

        let out = states.iter().any(|bits| bits[accept]);

        // on_path[i]: step i advanced a run that reaches the accept state.
        let mut on_path = vec![false; num_bytes + 1];
        for i in (0..num_bytes).rev() {
            let reach = states[i + 1][accept] || on_path[i + 1];
            on_path[i] = changed[i] && reach;
        }

        let reveals = circuit
            .reveals
            .iter()
            .map(|reveal| {
                let mask: Vec<bool> = (0..msg.len())
                    .map(|i| {
                        on_path[i + 1] && reveal.transitions.iter().any(|&g| and_gates[i + 1][g])
                    })
                    .collect();
                let bytes = mask
                    .iter()
                    .zip(msg)
                    .map(|(&keep, &b)| if keep { b } else { 0 })
                    .collect();
                Reveal {
                    name: reveal.name.clone(),
                    bytes,
                    mask,
                }
            })
            .collect();

        tracing::debug!(out, positions = num_bytes, "evaluated");
        Ok(Witness {
            out,
            accept_state: accept,
            states,
            on_path,
            reveals,
        })
    }

    /// Evaluate over `msg` right-padded with zeros to `msg_bytes`.
    pub fn run_padded(&self, msg: &[u8], msg_bytes: usize) -> Result<Witness, RuntimeError> {
        if msg.len() > msg_bytes {
            return Err(RuntimeError::InputTooLong {
                len: msg.len(),
                msg_bytes,
            });
        }
        self.run(&pad_bytes(msg, msg_bytes))
    }
}

/// Verify `circuit` and evaluate it over `msg`.
pub fn evaluate(circuit: &Circuit, msg: &[u8]) -> Result<Witness, RuntimeError> {
    VM::new(circuit)?.run(msg)
}
