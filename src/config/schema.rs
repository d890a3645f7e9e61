//! Configuration schema definitions.
//!
//! Every section carries `#[serde(default)]` so a partial file only
//! overrides the keys it names.

use super::error::{ConfigError, ConfigResult};
use crate::harness::Timings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial link to the DUT
    pub serial: SerialConfig,
    /// Orchestration timing and echo
    pub run: RunConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the harness cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.baud == 0 {
            return Err(ConfigError::validation("serial.baud", "must be non-zero"));
        }
        if self.run.drain_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "run.drain_timeout_ms",
                "must be non-zero",
            ));
        }
        if self.run.verdict_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "run.verdict_timeout_ms",
                "must be non-zero",
            ));
        }
        if self.run.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "run.poll_interval_ms",
                "must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path; without one the harness runs dry
    pub port: Option<String>,
    /// Line rate of the DUT's debug UART
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: 9600,
        }
    }
}

/// Orchestration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Echo wire traffic and packet summaries
    pub verbose: bool,
    pub drain_timeout_ms: u64,
    pub verdict_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            drain_timeout_ms: 2000,
            verdict_timeout_ms: 5000,
            poll_interval_ms: 1,
        }
    }
}

impl RunConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            drain: Duration::from_millis(self.drain_timeout_ms),
            remote_verdict: Duration::from_millis(self.verdict_timeout_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        };
        f.write_str(name)
    }
}
