//! Core traits for the serial channel abstraction.
//!
//! Defines the `SerialChannel` trait that lets the framer drive either a
//! real device or the in-memory mock without knowing which.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Line settings used when opening a physical port.
///
/// The DUT firmware talks 8N1 without flow control, so only the speed and
/// the driver-level read timeout are adjustable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Driver read timeout. Reads are only issued once bytes are known to be
    /// pending, so this merely bounds a misbehaving driver.
    pub timeout: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            timeout: Duration::from_millis(10),
        }
    }
}

impl PortConfiguration {
    /// Configuration for the given speed with the default timeout.
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Byte-oriented duplex connection to the device under test.
///
/// Framing is entirely the caller's responsibility; implementations only
/// deliver raw bytes in arrival order.
pub trait SerialChannel: Send + std::fmt::Debug {
    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&self) -> Result<usize, PortError>;

    /// Read a single byte. Only valid when `bytes_available() >= 1`.
    fn read_byte(&mut self) -> Result<u8, PortError>;

    /// Write all of `data` to the channel.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError>;

    /// Write a line terminator.
    fn write_newline(&mut self) -> Result<(), PortError> {
        self.write_bytes(b"\n")
    }

    /// Get the name/path of this channel.
    fn name(&self) -> &str;
}
