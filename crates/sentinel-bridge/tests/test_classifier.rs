//! Tests for circuit classification and its diagnostic contract.

use std::sync::Mutex;

use proptest::prelude::*;
use sentinel_bridge::classifier::OPTIMIZATION_PASS;
use sentinel_bridge::{
    CircuitSource, Diagnostic, DiagnosticSink, Marker, QasmVersion, validate_circuit,
    validate_circuit_with,
};

/// Sink that keeps every diagnostic it receives.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().unwrap().clone()
    }

    fn control_flow_reports(&self) -> usize {
        self.events()
            .iter()
            .filter(|d| matches!(d, Diagnostic::DynamicControlFlow(_)))
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.events.lock().unwrap().push(diagnostic.clone());
    }
}

const FEED_FORWARD_QASM3: &str = r#"OPENQASM 3.0;
include "stdgates.inc";
qubit[2] q;
bit[1] measurement_result;
h q[0];
measurement_result[0] = measure q[0];
if (measurement_result == 1) {
    x q[1];
}
"#;

const STATIC_QASM3: &str = r#"OPENQASM 3.0;
include "stdgates.inc";
qubit[2] q;
bit[2] c;
h q[0];
cx q[0], q[1];
c = measure q;
"#;

const C_IF_QASM2: &str = r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[1];
creg c[1];
measure q[0] -> c[0];
x q[0] c_if(c, 1);
"#;

// ---------------------------------------------------------------------------
// Diagnostic sequence
// ---------------------------------------------------------------------------

#[test]
fn feed_forward_program_reports_control_flow() {
    let sink = RecordingSink::default();
    let report = validate_circuit_with(FEED_FORWARD_QASM3, &sink);

    assert!(report.has_dynamic_control_flow());
    assert_eq!(report.version, QasmVersion::V3);
    assert_eq!(
        report.finding.map(|f| f.marker),
        Some(Marker::GenericConditional)
    );

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0],
        Diagnostic::ValidationStarted {
            version: QasmVersion::V3,
            ..
        }
    ));
    assert!(matches!(events[1], Diagnostic::DynamicControlFlow(_)));
    assert_eq!(
        events[2],
        Diagnostic::OptimizationAcknowledged {
            pass: OPTIMIZATION_PASS
        }
    );
}

#[test]
fn static_program_only_acknowledges() {
    let sink = RecordingSink::default();
    let report = validate_circuit_with(STATIC_QASM3, &sink);

    assert!(!report.has_dynamic_control_flow());
    assert_eq!(report.bytes, STATIC_QASM3.len());
    assert_eq!(sink.control_flow_reports(), 0);
    assert_eq!(sink.events().len(), 2);
}

#[test]
fn qasm2_c_if_is_detected() {
    let sink = RecordingSink::default();
    let report = validate_circuit_with(C_IF_QASM2, &sink);

    assert_eq!(report.version, QasmVersion::V2);
    let finding = report.finding.unwrap();
    assert_eq!(finding.marker, Marker::ClassicalConditional);
    assert_eq!(&C_IF_QASM2[finding.offset..finding.offset + 4], "c_if");
    assert_eq!(sink.control_flow_reports(), 1);
}

#[test]
fn many_markers_report_once() {
    let sink = RecordingSink::default();
    let program = "if (a) x q; c_if(c, 1); if (b) y q; ".repeat(100);
    validate_circuit_with(program.as_str(), &sink);
    assert_eq!(sink.control_flow_reports(), 1);
}

#[test]
fn empty_source_is_valid() {
    let sink = RecordingSink::default();
    let report = validate_circuit_with("", &sink);

    assert_eq!(report.bytes, 0);
    assert_eq!(report.version, QasmVersion::Unknown);
    assert!(!report.has_dynamic_control_flow());
    assert_eq!(sink.control_flow_reports(), 0);
    assert_eq!(sink.events().len(), 2);
}

#[test]
fn binary_garbage_is_valid() {
    let garbage: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let report = validate_circuit(CircuitSource::from_bytes(&garbage));
    assert!(!report.has_dynamic_control_flow());

    let mut with_marker = garbage.clone();
    with_marker.extend_from_slice(b"\xffc_if\x00");
    let report = validate_circuit(CircuitSource::from_bytes(&with_marker));
    assert_eq!(report.finding.unwrap().offset, garbage.len() + 1);
}

#[test]
fn multi_megabyte_source() {
    let mut program = String::from("OPENQASM 3.0;\nqubit[4] q;\n");
    while program.len() < 4 * 1024 * 1024 {
        program.push_str("h q[0];\ncx q[0], q[1];\n");
    }
    let clean = validate_circuit(program.as_str());
    assert!(!clean.has_dynamic_control_flow());

    program.push_str("if (c == 1) x q[2];\n");
    let dynamic = validate_circuit(program.as_str());
    assert!(dynamic.has_dynamic_control_flow());
}

#[test]
fn validation_does_not_retain_or_mutate_input() {
    let program = String::from(FEED_FORWARD_QASM3);
    let before = program.clone();
    let first = validate_circuit(program.as_str());
    let second = validate_circuit(program.as_str());
    assert_eq!(program, before);
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn contains_marker(bytes: &[u8]) -> bool {
    Marker::ALL.iter().any(|m| {
        let needle = m.pattern().as_bytes();
        bytes.windows(needle.len()).any(|w| w == needle)
    })
}

fn arb_marker() -> impl Strategy<Value = Marker> {
    prop_oneof![
        Just(Marker::ClassicalConditional),
        Just(Marker::GenericConditional)
    ]
}

proptest! {
    #[test]
    fn marker_free_text_never_reports(text in "[a-z_ ()\\[\\];=0-9\n]{0,256}") {
        prop_assume!(!contains_marker(text.as_bytes()));
        let sink = RecordingSink::default();
        let report = validate_circuit_with(text.as_str(), &sink);
        prop_assert!(!report.has_dynamic_control_flow());
        prop_assert_eq!(sink.control_flow_reports(), 0);
    }

    #[test]
    fn marker_free_bytes_never_report(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assume!(!contains_marker(&bytes));
        let report = validate_circuit(CircuitSource::from_bytes(&bytes));
        prop_assert!(!report.has_dynamic_control_flow());
    }

    #[test]
    fn embedded_marker_reports_exactly_once(
        prefix in "[a-z ;\n]{0,64}",
        marker in arb_marker(),
        suffix in "[a-z ;\n()]{0,64}",
    ) {
        prop_assume!(!contains_marker(prefix.as_bytes()));
        let text = format!("{prefix}{}{suffix}", marker.pattern());
        let sink = RecordingSink::default();
        let report = validate_circuit_with(text.as_str(), &sink);

        prop_assert_eq!(sink.control_flow_reports(), 1);
        let finding = report.finding.unwrap();
        prop_assert_eq!(finding.offset, prefix.len());
        prop_assert_eq!(finding.marker, marker);
    }
}
