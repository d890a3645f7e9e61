//! Sequential test orchestration.
//!
//! Each test walks the same fixed path: drain, signal the id, run the body,
//! wait for the DUT's verdict, reconcile. Nothing loops back and no outcome
//! stops the run.

use crate::framer::Framer;
use crate::harness::registry::{TestCase, TestRegistry};
use crate::harness::report::{Reporter, RunSummary, TestOutcome};
use crate::harness::verdict::{reconcile, Verdict};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wait budgets used around every test body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Budget for flushing stale frames before a test.
    pub drain: Duration,
    /// Budget for the DUT's verdict after the body returns.
    pub remote_verdict: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            drain: Duration::from_secs(2),
            remote_verdict: Duration::from_secs(5),
        }
    }
}

/// Drives test cases over a single framer.
#[derive(Debug)]
pub struct Orchestrator {
    framer: Framer,
    timings: Timings,
}

impl Orchestrator {
    pub fn new(framer: Framer) -> Self {
        Self::with_timings(framer, Timings::default())
    }

    pub fn with_timings(framer: Framer, timings: Timings) -> Self {
        Self { framer, timings }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn framer_mut(&mut self) -> &mut Framer {
        &mut self.framer
    }

    pub fn into_framer(self) -> Framer {
        self.framer
    }

    /// Run one test to completion.
    pub fn run_case(&mut self, case: &TestCase) -> TestOutcome {
        if !self.framer.drain(self.timings.drain) {
            debug!(id = case.id, "no drain marker before test");
        }

        self.framer.send_signal(case.id);

        let local = case.run(&mut self.framer);

        let remote = match self.framer.await_signal(self.timings.remote_verdict) {
            Some(code) => {
                let verdict = Verdict::from_code(code);
                if verdict.is_none() {
                    warn!(id = case.id, code, "unknown verdict code from DUT");
                }
                verdict
            }
            None => {
                debug!(id = case.id, "DUT sent no verdict");
                None
            }
        };

        let classification = reconcile(local, remote);
        info!(
            id = case.id,
            test = case.name,
            %local,
            remote = ?remote,
            %classification,
            "test finished"
        );

        TestOutcome {
            id: case.id,
            name: case.name.to_string(),
            classification,
            local,
            remote,
        }
    }

    /// Run every registered test in id order, reporting each outcome.
    pub fn run(&mut self, registry: &TestRegistry, reporter: &mut dyn Reporter) -> RunSummary {
        let mut summary = RunSummary::default();

        if !self.framer.is_attached() {
            warn!("no transport configured, running dry");
        }

        for case in registry.iter() {
            reporter.test_started(case);
            let outcome = self.run_case(case);
            summary.record(outcome.classification);
            reporter.test_finished(&outcome);
        }

        reporter.run_finished(&summary);
        summary
    }
}
