//! Gate program for a scanning DFA circuit.
//!
//! A [`Circuit`] describes the body of the per-byte loop of the generated
//! template. The ops run once per input position `i`, in order, reading the
//! byte `in[i]` and the previous state vector `states[i]`, and they write the
//! next state vector `states[i+1]`. Everything outside the loop (idle-state
//! bookkeeping, the accept aggregate, reveal masking) is fixed structure
//! derived from the remaining fields.
//!
//! Component ids are dense per kind, so a kind's count is its largest id plus one.

use std::fmt::{self, Write};

use crate::byte_set::DisplayByte;

/// Operand of a byte comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The current input byte `in[i]`.
    Input,
    Const(u8),
}

/// A per-position signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wire {
    Eq(usize),
    Lt(usize),
    And(usize),
    Or(usize),
    /// Bit of a state in the vector before the current byte.
    State(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// `eq[id] = in[i] == value`
    Eq { id: usize, value: u8 },
    /// `lt[id] = lhs <= rhs`, 8-bit comparison
    LessEq {
        id: usize,
        lhs: Operand,
        rhs: Operand,
    },
    /// `and[id] = a & b`
    And { id: usize, a: Wire, b: Wire },
    /// `multi_or[id] = inputs[0] | inputs[1] | ...`
    Or { id: usize, inputs: Vec<Wire> },
    /// `states[i+1][state] = from`, or constant 0 when nothing leads there.
    SetState { state: usize, from: Option<Wire> },
}

/// One revealed-byte output array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutput {
    /// Signal name, e.g. `reveal0`.
    pub name: String,
    /// AND gates of the transitions whose consumed byte is revealed.
    pub transitions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateCounts {
    pub eq: usize,
    pub lt: usize,
    pub and: usize,
    pub or: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    pub template_name: String,
    /// Source pattern, for the header comment.
    pub regex: String,
    pub num_states: usize,
    pub accept_state: usize,
    pub ops: Vec<Op>,
    pub reveals: Vec<RevealOutput>,
    /// Constrain every message byte to be below the sentinel.
    pub check_input_range: bool,
}

impl Circuit {
    pub fn counts(&self) -> GateCounts {
        let mut counts = GateCounts::default();
        for op in &self.ops {
            match op {
                Op::Eq { id, .. } => counts.eq = counts.eq.max(id + 1),
                Op::LessEq { id, .. } => counts.lt = counts.lt.max(id + 1),
                Op::And { id, .. } => counts.and = counts.and.max(id + 1),
                Op::Or { id, .. } => counts.or = counts.or.max(id + 1),
                Op::SetState { .. } => {}
            }
        }
        counts
    }

    /// Debug listing of the loop body, one op per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            writeln!(out, "{op}").expect("String write never fails");
        }
        for reveal in &self.reveals {
            let gates: Vec<String> = reveal
                .transitions
                .iter()
                .map(|id| Wire::And(*id).to_string())
                .collect();
            writeln!(out, "{} <- {}", reveal.name, gates.join(" | "))
                .expect("String write never fails");
        }
        out
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wire::Eq(id) => write!(f, "eq{id}"),
            Wire::Lt(id) => write!(f, "lt{id}"),
            Wire::And(id) => write!(f, "and{id}"),
            Wire::Or(id) => write!(f, "or{id}"),
            Wire::State(s) => write!(f, "s{s}"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Input => write!(f, "in"),
            Operand::Const(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Eq { id, value } => write!(f, "eq{id} = in == {}", DisplayByte(*value)),
            Op::LessEq { id, lhs, rhs } => write!(f, "lt{id} = {lhs} <= {rhs}"),
            Op::And { id, a, b } => write!(f, "and{id} = {a} & {b}"),
            Op::Or { id, inputs } => {
                let parts: Vec<String> = inputs.iter().map(Wire::to_string).collect();
                write!(f, "or{id} = {}", parts.join(" | "))
            }
            Op::SetState { state, from: Some(w) } => write!(f, "s{state}' = {w}"),
            Op::SetState { state, from: None } => write!(f, "s{state}' = 0"),
        }
    }
}
