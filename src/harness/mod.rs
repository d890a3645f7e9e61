//! Test orchestration: verdicts, the test registry, the orchestrator and the
//! reporting boundary.

pub mod orchestrator;
pub mod registry;
pub mod report;
pub mod verdict;

pub use orchestrator::{Orchestrator, Timings};
pub use registry::{parse_test_id, Group, RegistryError, TestCase, TestFn, TestRegistry};
pub use report::{ConsoleReporter, JsonReport, JsonReporter, Reporter, RunSummary, TestOutcome};
pub use verdict::{reconcile, Classification, Verdict, VERDICT_NOK, VERDICT_OK};
