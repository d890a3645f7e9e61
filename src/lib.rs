//! Host-side conformance harness for an embedded network stack.
//!
//! The DUT exposes its network interface over a serial line: packets travel
//! as hex-encoded `P:` lines, test ids and verdicts as decimal `T:` lines.
//! This crate frames that protocol, runs registered test cases one at a time
//! against the DUT and reconciles both sides' verdicts.
//!
//! # Modules
//!
//! - `port`: serial channel abstraction, real device and scripted mock
//! - `framer`: line codec and the timeout-bounded transport framer
//! - `harness`: verdicts, test registry, orchestrator and reporters
//! - `suite`: the link/IPv6/ND/UDP/CoAP scenarios
//! - `config`: TOML configuration with environment overrides
//! - `logging`: tracing subscriber setup
//! - `error`: top-level error type

pub mod config;
pub mod error;
pub mod framer;
pub mod harness;
pub mod logging;
pub mod port;
pub mod suite;

pub use error::{AppError, AppResult};
pub use framer::{Frame, FrameKind, Framer};
pub use harness::{
    reconcile, Classification, Orchestrator, Reporter, RunSummary, TestCase, TestOutcome,
    TestRegistry, Timings, Verdict,
};
pub use port::{MockSerialPort, PortConfiguration, PortError, SerialChannel, SyncSerialPort};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
