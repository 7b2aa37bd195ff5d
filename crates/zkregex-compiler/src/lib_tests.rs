use zkregex_core::{DecomposedRegexConfig, GraphError, RegexPart};

use super::*;

#[test]
fn compile_pattern() {
    let graph = compile("a*b").unwrap();
    assert_eq!(
        graph.to_json(),
        r#"[{"type":"","edges":{"[97]":0,"[98]":1}},{"type":"accept","edges":{}}]"#
    );
}

#[test]
fn compile_rejects_classes_when_forbidden() {
    let options = ParseOptions::new().allow_classes(false);
    let err = compile_with("[a-z]", &options).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    insta::assert_snapshot!(err, @"error at 0..5: CharacterClass not supported");

    assert!(compile_with("a|b", &options).is_ok());
}

#[test]
fn structural_errors_propagate() {
    let err = compile("a|ab").unwrap_err();
    assert!(matches!(err, Error::Graph(GraphError::MultipleAcceptNodes(2))));
    insta::assert_snapshot!(err, @"size of accept nodes must be one (found 2)");

    let err = gen_circom("a*", "T", &[], &CircomConfig::default()).unwrap_err();
    insta::assert_snapshot!(err, @"accept node must not be 0");
}

#[test]
fn negated_class_compiles_to_single_accept() {
    let graph = compile("[^b]").unwrap();
    assert_eq!(graph.accept_node(), Ok(1));
    assert!(!graph.is_full_match(b"b"));
    assert!(graph.is_full_match(&[0x80]));

    let text = gen_circom("[^;]+;", "Field", &[], &CircomConfig::default()).unwrap();
    // Only the sentinel assignment mentions 255; no gate compares against it.
    assert!(!text.contains("<== 255;"), "{text}");
}

#[test]
fn render_annotates_parse_errors() {
    let err = compile("a|").unwrap_err();
    let rendered = err.render();
    assert!(rendered.contains("error: empty alternative"), "{rendered}");
    assert!(rendered.contains("help: use `ϵ` to match the empty string"), "{rendered}");

    let err = compile("a|ab").unwrap_err();
    assert_eq!(err.render(), err.to_string());
}

#[test]
fn gen_circom_is_deterministic() {
    let config = CircomConfig::default();
    let first = gen_circom("(\\r\\n|\\^)from:[a-z]+", "From", &[], &config).unwrap();
    let second = gen_circom("(\\r\\n|\\^)from:[a-z]+", "From", &[], &config).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("template From(msg_bytes) {"));
}

#[test]
fn decomposed_from_json_reports_missing_fields() {
    let err = decomposed_from_json(r#"{"max_byte_size": 64}"#).unwrap_err();
    assert!(err.to_string().contains("missing field `parts`"), "{err}");

    let err = decomposed_from_json(r#"{"parts": [{"is_public": true}]}"#).unwrap_err();
    assert!(err.to_string().contains("missing field `regex_def`"), "{err}");
}

#[test]
fn decomposed_circuit_reveals_public_parts() {
    let config = decomposed_from_json(
        r#"{"parts": [
            {"is_public": false, "regex_def": "subject:"},
            {"is_public": true, "regex_def": "[a-z]+"},
            {"is_public": false, "regex_def": "\r\n"}
        ]}"#,
    )
    .unwrap();
    let text = gen_from_decomposed(&config, "Subject", &CircomConfig::default()).unwrap();
    assert!(text.contains("signal output reveal1[msg_bytes];"), "{text}");
    assert!(!text.contains("signal output reveal0"), "{text}");
    assert!(!text.contains("signal output reveal2"), "{text}");
    // Helper signals are numbered by output position, not by part.
    assert!(text.contains("reveal1[i] <== in[i+1] * is_reveal0[i];"), "{text}");
}

#[test]
fn decomposed_errors_surface_part_errors_unchanged() {
    let config = DecomposedRegexConfig::new(vec![RegexPart::public("a"), RegexPart::private("(b")]);
    let err = gen_from_decomposed(&config, "T", &CircomConfig::default()).unwrap_err();
    insta::assert_snapshot!(err, @"error at 0..1: missing right parentheses (related: input ends here at 2..2)");
}

#[test]
fn extract_with_config() {
    let config = DecomposedRegexConfig::new(vec![RegexPart::public("Hello")]);
    let input = "From: a\r\nSubject: Hello world";
    assert_eq!(extract_substr_idxes(&config, input).unwrap(), vec![(18, 23)]);
    assert_eq!(extract_substrs(&config, input).unwrap(), vec!["Hello"]);

    let err = extract_substrs(&config, "Goodbye").unwrap_err();
    assert!(matches!(err, Error::Extract(ExtractError::NoMatch { .. })));
}
