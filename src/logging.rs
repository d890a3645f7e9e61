//! Tracing subscriber setup.
//!
//! Everything goes to stderr; stdout carries the per-test report.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::AppError;
use tracing_subscriber::EnvFilter;

/// Directive that turns on the crate's debug output, wire echo included.
const VERBOSE_DIRECTIVE: &str = "dut_harness=debug";

/// Build the filter directive: `RUST_LOG` wins, otherwise the configured
/// level, raised for this crate when `verbose` is set.
pub fn filter_directive(level: &str, verbose: bool, rust_log: Option<&str>) -> String {
    if let Some(env) = rust_log.filter(|s| !s.trim().is_empty()) {
        return env.to_string();
    }
    if verbose {
        format!("{level},{VERBOSE_DIRECTIVE}")
    } else {
        level.to_string()
    }
}

/// Install the global subscriber. Fails if one is already installed or the
/// filter does not parse.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<(), AppError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(&config.level, verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| AppError::Logging(format!("invalid filter '{directive}': {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| AppError::Logging(e.to_string()))
}
