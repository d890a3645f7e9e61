//! Reporting through a whole run.

use crate::common::{orchestrator_for, passes_on_start, scripted_dut};
use dut_harness::framer::Framer;
use dut_harness::harness::{
    Classification, ConsoleReporter, JsonReport, JsonReporter, TestCase, TestRegistry, Verdict,
};

fn idle(_: &mut Framer) -> Verdict {
    Verdict::Ok
}

fn registry() -> TestRegistry {
    let mut registry = TestRegistry::new();
    registry
        .register_all([
            TestCase::new(0x11, "mac_recv_nodata", idle),
            TestCase::new(0x12, "mac_recv_data_ucast", idle),
        ])
        .unwrap();
    registry
}

#[test]
fn test_console_lines_and_summary() {
    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x11);

    let mut reporter = ConsoleReporter::new(Vec::new());
    orchestrator_for(&dut).run(&registry(), &mut reporter);
    let text = String::from_utf8(reporter.finish().unwrap()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("test 17: mac_recv_nodata"));
    assert!(lines[0].ends_with("[PASS]"));
    assert!(lines[1].starts_with("test 18: mac_recv_data_ucast"));
    assert!(lines[1].ends_with("[ERROR]"));
    assert!(text.contains("2 tests: 1 passed, 0 failed, 1 inconclusive"));
}

#[test]
fn test_json_report_document() {
    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x11);
    passes_on_start(&mut dut, 0x12);

    let mut reporter = JsonReporter::new(Some("MOCK0".to_string()));
    let summary = orchestrator_for(&dut).run(&registry(), &mut reporter);
    assert!(summary.all_passed());

    let mut out = Vec::new();
    reporter.write_to(&mut out).unwrap();
    let report: JsonReport = serde_json::from_slice(&out).unwrap();
    assert_eq!(report.transport.as_deref(), Some("MOCK0"));
    assert_eq!(report.outcomes.len(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.classification == Classification::Pass));
    assert!(report.finished_at.unwrap() >= report.started_at);
    assert_eq!(report.summary.passed, 2);
}

#[test]
fn test_json_uses_wire_names() {
    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x11);

    let mut reporter = JsonReporter::new(None);
    orchestrator_for(&dut).run(&registry(), &mut reporter);
    let value = serde_json::to_value(reporter.into_report()).unwrap();

    assert_eq!(value["outcomes"][0]["classification"], "PASS");
    assert_eq!(value["outcomes"][0]["local"], "ok");
    assert_eq!(value["outcomes"][1]["classification"], "ERROR");
    assert!(value["outcomes"][1]["remote"].is_null());
}
