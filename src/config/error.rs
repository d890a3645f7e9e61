//! Configuration errors. All of them are fatal at startup, before any test
//! touches the DUT.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file was named explicitly but is missing.
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable, e.g. a zero timeout.
    #[error("bad value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("bad value in ${var}: {message}")]
    EnvParse { var: String, message: String },
}

impl ConfigError {
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env_parse(var: impl Into<String>, message: impl ToString) -> Self {
        Self::EnvParse {
            var: var.into(),
            message: message.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_key() {
        let err = ConfigError::validation("run.drain_timeout_ms", "must be non-zero");
        assert_eq!(
            err.to_string(),
            "bad value for run.drain_timeout_ms: must be non-zero"
        );

        let err = ConfigError::env_parse("DUT_HARNESS_SERIAL_BAUD", "not a baud rate");
        assert_eq!(
            err.to_string(),
            "bad value in $DUT_HARNESS_SERIAL_BAUD: not a baud rate"
        );
    }

    #[test]
    fn test_missing_file_shows_path() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/dut-harness/none.toml"));
        assert!(err.to_string().contains("/etc/dut-harness/none.toml"));
    }
}
