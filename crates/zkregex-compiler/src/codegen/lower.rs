//! Graph → gate program.
//!
//! For every non-start node, each incoming edge becomes
//! `state[from] AND detector(chars)` and the node's next bit is the OR of
//! those conjunctions. Range checks, equality checks, ORs and ANDs are
//! memoized on their operands so identical sub-expressions share one gate.
//!
//! Edges into node 0 are not lowered: node 0 is the idle state and its bit
//! is derived from whether any other node fired.

use std::collections::{BTreeSet, HashMap};

use zkregex_core::{
    ANCHOR_BYTE, ByteSet, Circuit, Graph, Op, Operand, RevealOutput, START_NODE, Wire,
};

use super::{CircomConfig, CodegenError, RevealGroup, Selector, is_identifier};

/// Signal and component names used by the fixed template structure.
const RESERVED_NAMES: &[&str] = &[
    "msg",
    "out",
    "in",
    "in_range_checks",
    "eq",
    "lt",
    "and",
    "multi_or",
    "states",
    "state_changed",
    "final_state_result",
    "reach",
    "on_path",
];

/// A lowered edge and the AND gate that fires when it is taken.
#[derive(Debug, Clone, Copy)]
struct Transition {
    from: usize,
    to: usize,
    tag: Option<usize>,
    gate: usize,
}

pub fn lower(
    graph: &Graph,
    template_name: &str,
    regex: &str,
    reveals: &[RevealGroup],
    config: &CircomConfig,
) -> Result<Circuit, CodegenError> {
    let _span = tracing::debug_span!("lower", template = template_name, nodes = graph.len()).entered();

    graph.validate()?;
    let accept_state = graph.accept_node()?;
    check_names(template_name, reveals)?;

    let mut lowering = Lowering::new(config);
    let mut transitions = Vec::new();

    for (node, edges) in graph.incoming().into_iter().enumerate().skip(1) {
        let mut outputs = Vec::new();
        for (from, edge) in edges {
            let Some(chars) = circuit_chars(from, edge.chars) else {
                continue;
            };
            let detector = lowering.detect(chars);
            let gate = lowering.and(Wire::State(from), detector);
            outputs.push(Wire::And(gate));
            transitions.push(Transition {
                from,
                to: node,
                tag: edge.tag,
                gate,
            });
        }

        let from = match outputs.as_slice() {
            [] => None,
            [single] => Some(*single),
            _ => Some(Wire::Or(lowering.or(outputs))),
        };
        lowering.ops.push(Op::SetState { state: node, from });
    }

    let reveals = reveals
        .iter()
        .map(|group| select(graph, group, &transitions))
        .collect::<Result<Vec<_>, _>>()?;

    let circuit = Circuit {
        template_name: template_name.to_string(),
        regex: regex.to_string(),
        num_states: graph.len(),
        accept_state,
        ops: lowering.ops,
        reveals,
        check_input_range: config.check_input_range,
    };

    let counts = circuit.counts();
    tracing::debug!(
        eq = counts.eq,
        lt = counts.lt,
        and = counts.and,
        or = counts.or,
        "lowered circuit"
    );
    Ok(circuit)
}

/// Edge bytes as the circuit sees them. The anchor byte is the sentinel, so
/// it can only fire from the start node at position 0; elsewhere it is
/// dropped, along with edges left empty.
fn circuit_chars(from: usize, chars: ByteSet) -> Option<ByteSet> {
    let mut chars = chars;
    if from != START_NODE {
        chars.remove(ANCHOR_BYTE);
    }
    (!chars.is_empty()).then_some(chars)
}

fn check_names(template_name: &str, reveals: &[RevealGroup]) -> Result<(), CodegenError> {
    if !is_identifier(template_name) {
        return Err(CodegenError::InvalidIdentifier(template_name.to_string()));
    }
    let mut seen: BTreeSet<&str> = RESERVED_NAMES.iter().copied().collect();
    for group in reveals {
        if !is_identifier(&group.name) {
            return Err(CodegenError::InvalidIdentifier(group.name.clone()));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(CodegenError::DuplicateSignal(group.name.clone()));
        }
    }
    Ok(())
}

fn select(
    graph: &Graph,
    group: &RevealGroup,
    transitions: &[Transition],
) -> Result<RevealOutput, CodegenError> {
    let mut gates: BTreeSet<usize> = BTreeSet::new();
    match &group.selector {
        Selector::State(state) => {
            if *state == START_NODE || *state >= graph.len() {
                return Err(CodegenError::UnknownRevealState {
                    name: group.name.clone(),
                    state: *state,
                });
            }
            gates.extend(transitions.iter().filter(|t| t.to == *state).map(|t| t.gate));
        }
        Selector::Tag(tag) => {
            gates.extend(
                transitions
                    .iter()
                    .filter(|t| t.tag == Some(*tag))
                    .map(|t| t.gate),
            );
        }
        Selector::Transitions(pairs) => {
            for &(from, to) in pairs {
                let matching: Vec<usize> = transitions
                    .iter()
                    .filter(|t| t.from == from && t.to == to)
                    .map(|t| t.gate)
                    .collect();
                if matching.is_empty() {
                    return Err(CodegenError::UnknownTransition {
                        name: group.name.clone(),
                        from,
                        to,
                    });
                }
                gates.extend(matching);
            }
        }
    }

    if gates.is_empty() {
        tracing::warn!(reveal = %group.name, "reveal selects no transitions");
    }
    Ok(RevealOutput {
        name: group.name.clone(),
        transitions: gates.into_iter().collect(),
    })
}

// ─────────────────────────────────────────────────────────────────────────
// Gate allocation

struct Lowering<'a> {
    config: &'a CircomConfig,
    ops: Vec<Op>,
    next_eq: usize,
    next_lt: usize,
    next_and: usize,
    next_or: usize,
    eq_checks: HashMap<u8, usize>,
    range_checks: HashMap<(u8, u8), usize>,
    and_checks: HashMap<(Wire, Wire), usize>,
    or_checks: HashMap<Vec<Wire>, usize>,
}

impl<'a> Lowering<'a> {
    fn new(config: &'a CircomConfig) -> Self {
        Self {
            config,
            ops: Vec::new(),
            next_eq: 0,
            next_lt: 0,
            next_and: 0,
            next_or: 0,
            eq_checks: HashMap::new(),
            range_checks: HashMap::new(),
            and_checks: HashMap::new(),
            or_checks: HashMap::new(),
        }
    }

    /// Wire that is 1 exactly when the current byte is in `chars`.
    ///
    /// Long runs become range checks, listed first; the remaining bytes
    /// become equality checks in ascending order.
    fn detect(&mut self, chars: ByteSet) -> Wire {
        let mut wires = Vec::new();
        let mut singles = chars;
        for (lo, hi) in chars.runs() {
            if usize::from(hi - lo) + 1 >= self.config.range_threshold {
                wires.push(Wire::And(self.range(lo, hi)));
                singles = singles.difference(&ByteSet::range(lo, hi));
            }
        }
        for byte in singles.iter() {
            wires.push(Wire::Eq(self.eq(byte)));
        }

        match wires.as_slice() {
            [single] => *single,
            _ => Wire::Or(self.or(wires)),
        }
    }

    fn eq(&mut self, value: u8) -> usize {
        if let Some(&id) = self.eq_checks.get(&value) {
            return id;
        }
        let id = self.next_eq;
        self.next_eq += 1;
        self.ops.push(Op::Eq { id, value });
        self.eq_checks.insert(value, id);
        id
    }

    /// `lo <= in && in <= hi`, returning the AND gate.
    fn range(&mut self, lo: u8, hi: u8) -> usize {
        if let Some(&id) = self.range_checks.get(&(lo, hi)) {
            return id;
        }
        let lt = self.next_lt;
        self.next_lt += 2;
        self.ops.push(Op::LessEq {
            id: lt,
            lhs: Operand::Const(lo),
            rhs: Operand::Input,
        });
        self.ops.push(Op::LessEq {
            id: lt + 1,
            lhs: Operand::Input,
            rhs: Operand::Const(hi),
        });
        let id = self.and(Wire::Lt(lt), Wire::Lt(lt + 1));
        self.range_checks.insert((lo, hi), id);
        id
    }

    fn and(&mut self, a: Wire, b: Wire) -> usize {
        if let Some(&id) = self.and_checks.get(&(a, b)) {
            return id;
        }
        let id = self.next_and;
        self.next_and += 1;
        self.ops.push(Op::And { id, a, b });
        self.and_checks.insert((a, b), id);
        id
    }

    fn or(&mut self, inputs: Vec<Wire>) -> usize {
        if let Some(&id) = self.or_checks.get(&inputs) {
            return id;
        }
        let id = self.next_or;
        self.next_or += 1;
        self.ops.push(Op::Or {
            id,
            inputs: inputs.clone(),
        });
        self.or_checks.insert(inputs, id);
        id
    }
}
