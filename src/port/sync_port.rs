//! Physical serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` with our `SerialChannel`
//! trait so the framer can be tested against the mock.

use super::error::PortError;
use super::traits::{PortConfiguration, SerialChannel};
use std::io::{Read, Write};

/// Serial channel backed by `serialport::SerialPort`, 8N1, no flow control.
pub struct SyncSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port with the given configuration.
    ///
    /// # Example
    /// ```no_run
    /// use dut_harness::port::{PortConfiguration, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyACM0", PortConfiguration::with_baud(9600))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: PortConfiguration) -> Result<Self, PortError> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(config.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }

    /// Open a serial port at the firmware's default speed.
    pub fn open_default(port_name: &str) -> Result<Self, PortError> {
        Self::open(port_name, PortConfiguration::default())
    }
}

impl SerialChannel for SyncSerialPort {
    fn bytes_available(&self) -> Result<usize, PortError> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_byte(&mut self) -> Result<u8, PortError> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte)? {
            0 => Err(PortError::empty(&self.name)),
            _ => Ok(byte[0]),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.port.write_all(data)?;
        Ok(())
    }

    fn write_newline(&mut self) -> Result<(), PortError> {
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate().ok())
            .finish()
    }
}
