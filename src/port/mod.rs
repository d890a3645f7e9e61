//! Serial channel abstraction.
//!
//! Provides the `SerialChannel` trait, a real-device implementation and a
//! scripted mock, so the framer can run against either.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::{PortConfiguration, SerialChannel};
