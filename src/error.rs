//! Top-level error for the binary.
//!
//! Start-up failures, plus report output failing once the run is over.
//! While tests run, channel trouble degrades to absent frames and never
//! surfaces as an `AppError`.

use crate::config::ConfigError;
use crate::harness::RegistryError;
use crate::port::PortError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot open DUT port: {0}")]
    Port(#[from] PortError),

    #[error("test selection error: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid test id '{0}': expected decimal or 0x-prefixed hex")]
    InvalidTestId(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}
