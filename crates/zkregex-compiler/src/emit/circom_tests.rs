use indoc::indoc;

use super::render;
use crate::automata::build_graph;
use crate::codegen::{CircomConfig, RevealGroup, lower};
use crate::parser::parse;

fn emit(pattern: &str, reveals: &[RevealGroup], config: &CircomConfig) -> String {
    let graph = build_graph(&parse(pattern).unwrap()).unwrap();
    let circuit = lower(&graph, "Test", pattern, reveals, config).unwrap();
    render(&circuit, config)
}

#[test]
fn full_template() {
    insta::assert_snapshot!(emit("a*b", &[], &CircomConfig::default()), @r#"
    pragma circom 2.1.5;

    include "@zk-email/zk-regex-circom/circuits/regex_helpers.circom";

    // regex: a*b
    template Test(msg_bytes) {
        signal input msg[msg_bytes];
        signal output out;

        var num_bytes = msg_bytes+1;
        signal in[num_bytes];
        signal in_range_checks[msg_bytes];
        in[0]<==255;
        for (var i = 0; i < msg_bytes; i++) {
            in_range_checks[i] <== LessThan(8)([msg[i], 255]);
            in_range_checks[i] === 1;
            in[i+1] <== msg[i];
        }

        component eq[1][num_bytes];
        component and[1][num_bytes];
        signal states[num_bytes+1][2];
        component state_changed[num_bytes];

        states[0][0] <== 1;
        for (var i = 1; i < 2; i++) {
            states[0][i] <== 0;
        }

        for (var i = 0; i < num_bytes; i++) {
            state_changed[i] = MultiOR(1);
            eq[0][i] = IsEqual();
            eq[0][i].in[0] <== in[i];
            eq[0][i].in[1] <== 98;
            and[0][i] = AND();
            and[0][i].a <== states[i][0];
            and[0][i].b <== eq[0][i].out;
            states[i+1][1] <== and[0][i].out;
            state_changed[i].in[0] <== states[i+1][1];
            states[i+1][0] <== 1 - state_changed[i].out;
        }

        component final_state_result = MultiOR(num_bytes+1);
        for (var i = 0; i <= num_bytes; i++) {
            final_state_result.in[i] <== states[i][1];
        }
        out <== final_state_result.out;
    }
    "#);
}

#[test]
fn range_and_or_gates() {
    let text = emit("[a-z]x", &[], &CircomConfig::default());
    assert!(text.contains("component lt[2][num_bytes];"), "{text}");
    assert!(text.contains("lt[0][i].in[0] <== 97;\n        lt[0][i].in[1] <== in[i];"), "{text}");
    assert!(text.contains("lt[1][i].in[0] <== in[i];\n        lt[1][i].in[1] <== 122;"), "{text}");

    let text = emit("ab|ba", &[], &CircomConfig::default());
    assert!(text.contains("component multi_or[1][num_bytes];"), "{text}");
    assert!(text.contains("multi_or[0][i] = MultiOR(2);"), "{text}");
    assert!(text.contains("states[i+1][3] <== multi_or[0][i].out;"), "{text}");
}

#[test]
fn reveal_section() {
    let text = emit("ab|ba", &[RevealGroup::state("reveal0", 3)], &CircomConfig::default());
    let tail = text.split("out <== final_state_result.out;\n").nth(1).unwrap();
    assert_eq!(
        tail,
        indoc! {"

                signal reach[num_bytes];
                signal on_path[num_bytes+1];
                on_path[num_bytes] <== 0;
                for (var j = 0; j < num_bytes; j++) {
                    reach[num_bytes-1-j] <== states[num_bytes-j][3] + on_path[num_bytes-j] - states[num_bytes-j][3] * on_path[num_bytes-j];
                    on_path[num_bytes-1-j] <== state_changed[num_bytes-1-j].out * reach[num_bytes-1-j];
                }

                signal is_substr0[msg_bytes];
                signal is_reveal0[msg_bytes];
                signal output reveal0[msg_bytes];
                for (var i = 0; i < msg_bytes; i++) {
                    is_substr0[i] <== MultiOR(2)([and[2][i+1].out, and[3][i+1].out]);
                    is_reveal0[i] <== is_substr0[i] * on_path[i+1];
                    reveal0[i] <== in[i+1] * is_reveal0[i];
                }
            }
        "}
    );
}

#[test]
fn header_follows_config() {
    let config = CircomConfig::new()
        .pragma("2.1.9")
        .include("helpers.circom")
        .check_input_range(false);
    let text = emit("ab", &[], &config);
    assert!(text.starts_with("pragma circom 2.1.9;\n\ninclude \"helpers.circom\";\n"));
    assert!(!text.contains("in_range_checks"));
}

#[test]
fn regex_comment_is_single_line() {
    let text = emit("a\nb", &[], &CircomConfig::default());
    assert!(text.contains("// regex: a\\nb\n"), "{text}");
}

#[test]
fn emission_is_deterministic() {
    let pattern = "1=(a|b) (2=(b|c)+ )+d";
    let config = CircomConfig::default();
    assert_eq!(emit(pattern, &[], &config), emit(pattern, &[], &config));
}
