//! Orchestrator scenarios: one test each, from drain to classification.

use crate::common::{
    emits_on_start, fails_on_start, orchestrator_for, passes_on_start, quick_timings,
    scripted_dut, sent_signals, verdict_on_start,
};
use dut_harness::framer::Framer;
use dut_harness::harness::{
    Classification, Orchestrator, TestCase, TestOutcome, TestRegistry, Verdict,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn idle(_: &mut Framer) -> Verdict {
    Verdict::Ok
}

fn send_only(framer: &mut Framer) -> Verdict {
    framer.send_packet(b"stimulus");
    Verdict::Ok
}

fn expects_reply(framer: &mut Framer) -> Verdict {
    Verdict::from_bool(framer.receive_packet(Duration::from_millis(500)).is_some())
}

#[test]
fn test_idle_case_with_prompt_ok_passes() {
    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x11);

    let outcome = orchestrator_for(&dut).run_case(&TestCase::new(0x11, "idle", idle));

    assert_eq!(outcome.local, Verdict::Ok);
    assert_eq!(outcome.remote, Some(Verdict::Ok));
    assert_eq!(outcome.classification, Classification::Pass);
}

#[test]
fn test_missing_reply_and_silent_dut_fails() {
    let dut = scripted_dut();

    let outcome =
        orchestrator_for(&dut).run_case(&TestCase::new(0x16, "expects_reply", expects_reply));

    assert_eq!(outcome.local, Verdict::Nok);
    assert_eq!(outcome.remote, None);
    assert_eq!(outcome.classification, Classification::Fail);
}

#[test]
fn test_dut_nok_overrides_local_ok() {
    let mut dut = scripted_dut();
    fails_on_start(&mut dut, 0x21);

    let outcome = orchestrator_for(&dut).run_case(&TestCase::new(0x21, "send_only", send_only));

    assert_eq!(outcome.local, Verdict::Ok);
    assert_eq!(outcome.remote, Some(Verdict::Nok));
    assert_eq!(outcome.classification, Classification::Fail);
}

#[test]
fn test_dry_run_send_only_is_inconclusive() {
    let mut orchestrator = Orchestrator::with_timings(Framer::detached(), quick_timings());

    let outcome = orchestrator.run_case(&TestCase::new(0x12, "send_only", send_only));

    assert_eq!(outcome.local, Verdict::Ok);
    assert_eq!(outcome.remote, None);
    assert_eq!(outcome.classification, Classification::Error);
}

#[test]
fn test_signal_precedes_body_traffic() {
    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x21);

    orchestrator_for(&dut).run_case(&TestCase::new(0x21, "send_only", send_only));

    let lines = dut.written_lines();
    assert_eq!(lines[0], "T: 33");
    assert!(lines[1].starts_with("P: "));
}

#[test]
fn test_stale_verdict_is_drained_before_next_test() {
    let mut dut = scripted_dut();
    // Leftover from an earlier run, then the DUT's sync marker.
    dut.enqueue_read(b"T: 1\nD: ready\n");
    passes_on_start(&mut dut, 0x11);

    let outcome = orchestrator_for(&dut).run_case(&TestCase::new(0x11, "idle", idle));

    assert_eq!(outcome.classification, Classification::Pass);
}

#[test]
fn test_reply_packet_then_verdict() {
    let mut dut = scripted_dut();
    emits_on_start(&mut dut, 0x17, b"\x01\x02", 0);

    let outcome =
        orchestrator_for(&dut).run_case(&TestCase::new(0x17, "expects_reply", expects_reply));

    assert_eq!(outcome.classification, Classification::Pass);
}

#[test]
fn test_full_run_visits_every_case_in_order() {
    let mut registry = TestRegistry::new();
    registry
        .register_all([
            TestCase::new(0x13, "c", send_only),
            TestCase::new(0x11, "a", idle),
            TestCase::new(0x12, "b", expects_reply),
        ])
        .unwrap();

    let mut dut = scripted_dut();
    passes_on_start(&mut dut, 0x11);
    verdict_on_start(&mut dut, 0x12, 0);
    verdict_on_start(&mut dut, 0x13, 9);

    let mut outcomes: Vec<TestOutcome> = Vec::new();
    let summary = orchestrator_for(&dut).run(&registry, &mut outcomes);

    assert_eq!(sent_signals(&dut), vec![0x11, 0x12, 0x13]);
    let classes: Vec<_> = outcomes.iter().map(|o| o.classification).collect();
    assert_eq!(
        classes,
        vec![
            Classification::Pass,
            Classification::Fail,
            Classification::Error
        ]
    );
    assert_eq!((summary.passed, summary.failed, summary.errors), (1, 1, 1));
    assert!(!summary.all_passed());
}
