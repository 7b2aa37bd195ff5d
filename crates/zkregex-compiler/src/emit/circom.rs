//! Circom source rendering.
//!
//! Template layout:
//! - header (pragma, helper include, regex comment)
//! - input plumbing: the sentinel at `in[0]`, message bytes after it
//! - component declarations sized by the gate counts
//! - the per-byte transition loop built from the circuit ops
//! - the accept aggregate over every position
//! - for each reveal, the masked byte array

use std::fmt::Write;

use zkregex_core::utils::comment_safe;
use zkregex_core::{Circuit, INPUT_SENTINEL, Op, Operand, Wire};

use crate::codegen::CircomConfig;

const IND: &str = "    ";
const IND2: &str = "        ";

/// Render `circuit` as a circom template.
pub fn render(circuit: &Circuit, config: &CircomConfig) -> String {
    let mut out = String::new();
    header(&mut out, circuit, config);
    declarations(&mut out, circuit);
    transition_loop(&mut out, circuit);
    accept(&mut out, circuit);
    if !circuit.reveals.is_empty() {
        reveals(&mut out, circuit);
    }
    out.push_str("}\n");
    out
}

fn header(out: &mut String, circuit: &Circuit, config: &CircomConfig) {
    writeln!(out, "pragma circom {};", config.pragma).expect("String write never fails");
    out.push('\n');
    writeln!(out, "include \"{}\";", config.include).expect("String write never fails");
    out.push('\n');
    writeln!(out, "// regex: {}", comment_safe(&circuit.regex)).expect("String write never fails");
    writeln!(out, "template {}(msg_bytes) {{", circuit.template_name)
        .expect("String write never fails");
    writeln!(out, "{IND}signal input msg[msg_bytes];").expect("String write never fails");
    writeln!(out, "{IND}signal output out;").expect("String write never fails");
    out.push('\n');
    writeln!(out, "{IND}var num_bytes = msg_bytes+1;").expect("String write never fails");
    writeln!(out, "{IND}signal in[num_bytes];").expect("String write never fails");
    if circuit.check_input_range {
        writeln!(out, "{IND}signal in_range_checks[msg_bytes];").expect("String write never fails");
    }
    writeln!(out, "{IND}in[0]<=={INPUT_SENTINEL};").expect("String write never fails");
    writeln!(out, "{IND}for (var i = 0; i < msg_bytes; i++) {{").expect("String write never fails");
    if circuit.check_input_range {
        writeln!(
            out,
            "{IND2}in_range_checks[i] <== LessThan(8)([msg[i], {INPUT_SENTINEL}]);"
        )
        .expect("String write never fails");
        writeln!(out, "{IND2}in_range_checks[i] === 1;").expect("String write never fails");
    }
    writeln!(out, "{IND2}in[i+1] <== msg[i];").expect("String write never fails");
    writeln!(out, "{IND}}}").expect("String write never fails");
    out.push('\n');
}

fn declarations(out: &mut String, circuit: &Circuit) {
    let counts = circuit.counts();
    for (name, count) in [
        ("eq", counts.eq),
        ("lt", counts.lt),
        ("and", counts.and),
        ("multi_or", counts.or),
    ] {
        if count > 0 {
            writeln!(out, "{IND}component {name}[{count}][num_bytes];")
                .expect("String write never fails");
        }
    }
    let n = circuit.num_states;
    writeln!(out, "{IND}signal states[num_bytes+1][{n}];").expect("String write never fails");
    writeln!(out, "{IND}component state_changed[num_bytes];").expect("String write never fails");
    out.push('\n');

    writeln!(out, "{IND}states[0][0] <== 1;").expect("String write never fails");
    writeln!(out, "{IND}for (var i = 1; i < {n}; i++) {{").expect("String write never fails");
    writeln!(out, "{IND2}states[0][i] <== 0;").expect("String write never fails");
    writeln!(out, "{IND}}}").expect("String write never fails");
    out.push('\n');
}

fn transition_loop(out: &mut String, circuit: &Circuit) {
    writeln!(out, "{IND}for (var i = 0; i < num_bytes; i++) {{").expect("String write never fails");
    writeln!(
        out,
        "{IND2}state_changed[i] = MultiOR({});",
        circuit.num_states - 1
    )
    .expect("String write never fails");
    for op in &circuit.ops {
        render_op(out, op);
    }
    writeln!(out, "{IND2}states[i+1][0] <== 1 - state_changed[i].out;")
        .expect("String write never fails");
    writeln!(out, "{IND}}}").expect("String write never fails");
    out.push('\n');
}

fn render_op(out: &mut String, op: &Op) {
    match op {
        Op::Eq { id, value } => {
            writeln!(out, "{IND2}eq[{id}][i] = IsEqual();").expect("String write never fails");
            writeln!(out, "{IND2}eq[{id}][i].in[0] <== in[i];").expect("String write never fails");
            writeln!(out, "{IND2}eq[{id}][i].in[1] <== {value};")
                .expect("String write never fails");
        }
        Op::LessEq { id, lhs, rhs } => {
            writeln!(out, "{IND2}lt[{id}][i] = LessEqThan(8);").expect("String write never fails");
            writeln!(out, "{IND2}lt[{id}][i].in[0] <== {};", operand(*lhs))
                .expect("String write never fails");
            writeln!(out, "{IND2}lt[{id}][i].in[1] <== {};", operand(*rhs))
                .expect("String write never fails");
        }
        Op::And { id, a, b } => {
            writeln!(out, "{IND2}and[{id}][i] = AND();").expect("String write never fails");
            writeln!(out, "{IND2}and[{id}][i].a <== {};", signal(*a))
                .expect("String write never fails");
            writeln!(out, "{IND2}and[{id}][i].b <== {};", signal(*b))
                .expect("String write never fails");
        }
        Op::Or { id, inputs } => {
            writeln!(out, "{IND2}multi_or[{id}][i] = MultiOR({});", inputs.len())
                .expect("String write never fails");
            for (k, input) in inputs.iter().enumerate() {
                writeln!(out, "{IND2}multi_or[{id}][i].in[{k}] <== {};", signal(*input))
                    .expect("String write never fails");
            }
        }
        Op::SetState { state, from } => {
            let value = from.map_or_else(|| "0".to_string(), signal);
            writeln!(out, "{IND2}states[i+1][{state}] <== {value};")
                .expect("String write never fails");
            writeln!(
                out,
                "{IND2}state_changed[i].in[{}] <== states[i+1][{state}];",
                state - 1
            )
            .expect("String write never fails");
        }
    }
}

fn accept(out: &mut String, circuit: &Circuit) {
    writeln!(out, "{IND}component final_state_result = MultiOR(num_bytes+1);")
        .expect("String write never fails");
    writeln!(out, "{IND}for (var i = 0; i <= num_bytes; i++) {{").expect("String write never fails");
    writeln!(
        out,
        "{IND2}final_state_result.in[i] <== states[i][{}];",
        circuit.accept_state
    )
    .expect("String write never fails");
    writeln!(out, "{IND}}}").expect("String write never fails");
    writeln!(out, "{IND}out <== final_state_result.out;").expect("String write never fails");
}

/// `on_path[i]` is 1 when step `i` advanced a run that goes on to reach the
/// accept node. A reveal byte is kept only on such steps.
fn reveals(out: &mut String, circuit: &Circuit) {
    let a = circuit.accept_state;
    out.push('\n');
    writeln!(out, "{IND}signal reach[num_bytes];").expect("String write never fails");
    writeln!(out, "{IND}signal on_path[num_bytes+1];").expect("String write never fails");
    writeln!(out, "{IND}on_path[num_bytes] <== 0;").expect("String write never fails");
    writeln!(out, "{IND}for (var j = 0; j < num_bytes; j++) {{").expect("String write never fails");
    writeln!(
        out,
        "{IND2}reach[num_bytes-1-j] <== states[num_bytes-j][{a}] + on_path[num_bytes-j] - states[num_bytes-j][{a}] * on_path[num_bytes-j];"
    )
    .expect("String write never fails");
    writeln!(
        out,
        "{IND2}on_path[num_bytes-1-j] <== state_changed[num_bytes-1-j].out * reach[num_bytes-1-j];"
    )
    .expect("String write never fails");
    writeln!(out, "{IND}}}").expect("String write never fails");

    for (k, reveal) in circuit.reveals.iter().enumerate() {
        out.push('\n');
        let gates: Vec<String> = reveal
            .transitions
            .iter()
            .map(|id| format!("and[{id}][i+1].out"))
            .collect();
        let substr = match gates.as_slice() {
            [] => "0".to_string(),
            [single] => single.clone(),
            _ => format!("MultiOR({})([{}])", gates.len(), gates.join(", ")),
        };

        writeln!(out, "{IND}signal is_substr{k}[msg_bytes];").expect("String write never fails");
        writeln!(out, "{IND}signal is_reveal{k}[msg_bytes];").expect("String write never fails");
        writeln!(out, "{IND}signal output {}[msg_bytes];", reveal.name)
            .expect("String write never fails");
        writeln!(out, "{IND}for (var i = 0; i < msg_bytes; i++) {{").expect("String write never fails");
        writeln!(out, "{IND2}is_substr{k}[i] <== {substr};").expect("String write never fails");
        writeln!(out, "{IND2}is_reveal{k}[i] <== is_substr{k}[i] * on_path[i+1];")
            .expect("String write never fails");
        writeln!(out, "{IND2}{}[i] <== in[i+1] * is_reveal{k}[i];", reveal.name)
            .expect("String write never fails");
        writeln!(out, "{IND}}}").expect("String write never fails");
    }
}

fn operand(op: Operand) -> String {
    match op {
        Operand::Input => "in[i]".to_string(),
        Operand::Const(b) => b.to_string(),
    }
}

fn signal(wire: Wire) -> String {
    match wire {
        Wire::Eq(id) => format!("eq[{id}][i].out"),
        Wire::Lt(id) => format!("lt[{id}][i].out"),
        Wire::And(id) => format!("and[{id}][i].out"),
        Wire::Or(id) => format!("multi_or[{id}][i].out"),
        Wire::State(s) => format!("states[i][{s}]"),
    }
}
