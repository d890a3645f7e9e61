//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "DUT_HARNESS";

/// Config file name inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "dut-harness.toml";

const APP_DIR: &str = "dut-harness";

/// Environment variable for explicit config path
pub const CONFIG_PATH_ENV: &str = "DUT_HARNESS_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `DUT_HARNESS_CONFIG` environment variable (explicit path)
    /// 2. `./dut-harness.toml` (current directory)
    /// 3. `dut-harness/config.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables override file values in every case.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path, which must exist.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        if let Err(e) = apply_env_overrides(&mut config) {
            debug!("ignoring environment overrides: {e}");
        }

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        debug!(path = %path.display(), "{CONFIG_PATH_ENV} points nowhere, continuing lookup");
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. Platform config directory
    if let Some(app_config) = default_config_path() {
        if app_config.exists() {
            return Some(app_config);
        }
    }

    None
}

/// Where a user-level config file lives on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR).join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::Parse)
}

fn env_var(key: &str) -> (String, Option<String>) {
    let name = format!("{ENV_PREFIX}_{key}");
    let value = std::env::var(&name).ok();
    (name, value)
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern `DUT_HARNESS_<SECTION>_<KEY>`,
/// e.g. `DUT_HARNESS_SERIAL_PORT=/dev/ttyACM0`.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let (_, Some(val)) = env_var("SERIAL_PORT") {
        config.serial.port = (!val.is_empty()).then_some(val);
    }
    if let (name, Some(val)) = env_var("SERIAL_BAUD") {
        config.serial.baud = val
            .parse()
            .map_err(|_| ConfigError::env_parse(name, "not a baud rate"))?;
    }
    if let (name, Some(val)) = env_var("RUN_VERBOSE") {
        config.run.verbose = parse_flag(&val)
            .ok_or_else(|| ConfigError::env_parse(name, "expected true/false or 1/0"))?;
    }
    if let (_, Some(val)) = env_var("LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let (name, Some(val)) = env_var("LOGGING_FORMAT") {
        config.logging.format = val
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::env_parse(name, e))?;
    }

    Ok(())
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
