//! Configuration for the harness.
//!
//! TOML file, then `DUT_HARNESS_<SECTION>_<KEY>` environment overrides, then
//! command-line flags (applied by the binary).
//!
//! # Configuration Resolution
//!
//! 1. `DUT_HARNESS_CONFIG` environment variable (explicit path)
//! 2. `./dut-harness.toml`
//! 3. `dut-harness/config.toml` under the platform config directory
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud = 9600
//!
//! [run]
//! verdict_timeout_ms = 5000
//!
//! [logging]
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{default_config_path, resolve_config_path, ConfigLoader, CONFIG_PATH_ENV};
pub use schema::{Config, LogFormat, LoggingConfig, RunConfig, SerialConfig};
