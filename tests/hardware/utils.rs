//! Utility functions for hardware testing.

use dut_harness::framer::Framer;
use dut_harness::port::{PortConfiguration, SyncSerialPort};
use std::env;

/// Test port configuration from environment.
pub struct TestPortConfig {
    pub port_name: String,
    pub baud_rate: u32,
}

impl TestPortConfig {
    /// Get test configuration from environment variables.
    pub fn from_env() -> Option<Self> {
        let port_name = env::var("TEST_PORT").ok()?;
        let baud_rate = env::var("TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(9600);

        Some(TestPortConfig {
            port_name,
            baud_rate,
        })
    }

    pub fn to_port_config(&self) -> PortConfiguration {
        PortConfiguration::with_baud(self.baud_rate)
    }

    /// Open the port and wrap it in a framer.
    pub fn framer(&self) -> Framer {
        let port = SyncSerialPort::open(&self.port_name, self.to_port_config())
            .unwrap_or_else(|e| panic!("cannot open {}: {e}", self.port_name));
        Framer::new(Box::new(port))
    }
}

/// Skip test if hardware is not available.
pub fn skip_without_hardware() -> Option<TestPortConfig> {
    let config = TestPortConfig::from_env();
    if config.is_none() {
        println!("Skipping hardware test: TEST_PORT not set");
    }
    config
}
