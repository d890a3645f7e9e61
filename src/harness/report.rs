//! Reporting boundary: per-test outcomes and run summaries.

use crate::harness::registry::TestCase;
use crate::harness::verdict::{Classification, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Result of running one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub id: u32,
    pub name: String,
    pub classification: Classification,
    pub local: Verdict,
    /// `None` when the DUT stayed silent or sent an unknown code.
    pub remote: Option<Verdict>,
}

/// Counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Pass => self.passed += 1,
            Classification::Fail => self.failed += 1,
            Classification::Error => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Receives outcomes as the orchestrator produces them.
pub trait Reporter {
    /// Called before the test body runs.
    fn test_started(&mut self, _case: &TestCase) {}

    fn test_finished(&mut self, outcome: &TestOutcome);

    /// Called once after the last test.
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Collects outcomes in memory.
impl Reporter for Vec<TestOutcome> {
    fn test_finished(&mut self, outcome: &TestOutcome) {
        self.push(outcome.clone());
    }
}

/// Human-readable line per test:
///
/// ```text
/// test 17: mac_recv_nodata                           [PASS]
/// ```
///
/// A failed write never interrupts the run; the first one is kept and
/// returned by [`ConsoleReporter::finish`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    write_error: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_error: None,
        }
    }

    /// Hand back the writer, or the first write failure of the run.
    pub fn finish(self) -> io::Result<W> {
        match self.write_error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn keep(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.write_error.get_or_insert(e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn test_started(&mut self, case: &TestCase) {
        // Printed before the body runs so a hung DUT shows which test it is on.
        let result = write!(self.out, "test {}: {:<40}  ", case.id, case.name)
            .and_then(|()| self.out.flush());
        self.keep(result);
    }

    fn test_finished(&mut self, outcome: &TestOutcome) {
        let result = writeln!(self.out, "[{}]", outcome.classification);
        self.keep(result);
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let result = writeln!(
            self.out,
            "\n{} tests: {} passed, {} failed, {} inconclusive",
            summary.total(),
            summary.passed,
            summary.failed,
            summary.errors
        )
        .and_then(|()| self.out.flush());
        self.keep(result);
    }
}

/// Full run report, emitted as JSON at the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub transport: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<TestOutcome>,
    pub summary: RunSummary,
}

/// Buffers outcomes into a [`JsonReport`] written once the run is over.
pub struct JsonReporter {
    report: JsonReport,
}

impl JsonReporter {
    pub fn new(transport: Option<String>) -> Self {
        Self {
            report: JsonReport {
                transport,
                started_at: Utc::now(),
                finished_at: None,
                outcomes: Vec::new(),
                summary: RunSummary::default(),
            },
        }
    }

    pub fn report(&self) -> &JsonReport {
        &self.report
    }

    pub fn into_report(self) -> JsonReport {
        self.report
    }

    /// Write the report as one pretty-printed document and a newline.
    pub fn write_to<W: Write>(&self, mut out: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut out, &self.report)?;
        out.write_all(b"\n")
            .and_then(|()| out.flush())
            .map_err(serde_json::Error::io)
    }
}

impl Reporter for JsonReporter {
    fn test_finished(&mut self, outcome: &TestOutcome) {
        self.report.outcomes.push(outcome.clone());
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.report.summary = *summary;
        self.report.finished_at = Some(Utc::now());
    }
}
