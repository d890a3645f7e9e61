//! Port-specific error types.
//!
//! Kept separate from the harness errors: the framer absorbs these into
//! absent frames, only opening a port surfaces them to the caller.

use thiserror::Error;

/// Failures of a [`SerialChannel`](super::SerialChannel).
#[derive(Debug, Error)]
pub enum PortError {
    /// The named device does not exist.
    #[error("no serial device at {0}")]
    NotFound(String),

    #[error("serial I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The driver rejected the line settings.
    #[error("line settings rejected: {0}")]
    Config(String),

    /// A byte was requested while none was available.
    #[error("{0}: read with nothing pending")]
    Empty(String),

    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

impl PortError {
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn empty(port_name: impl Into<String>) -> Self {
        Self::Empty(port_name.into())
    }
}
