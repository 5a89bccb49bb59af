//! Application configuration loaded from a JSON file

use crate::exceptions::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Environment override for the log level
pub const LOG_LEVEL_ENV: &str = "FILEPROC_LOG_LEVEL";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master switch for log output
    pub enable_logging: bool,
    /// Level used when logging is enabled ("info", "debug", "json:debug", ...)
    pub log_level: String,
    /// Modulus size for generated RSA keys
    pub rsa_key_bits: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            enable_logging: false,
            log_level: "info".to_string(),
            rsa_key_bits: 2048,
        }
    }
}

impl Config {
    /// Load configuration, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Config> {
        let mut config = match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str::<Config>(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            if !level.is_empty() {
                config.enable_logging = true;
                config.log_level = level;
            }
        }

        Ok(config)
    }

    /// Level to hand to the logging backend
    pub fn effective_log_level(&self) -> &str {
        if self.enable_logging {
            &self.log_level
        } else {
            "off"
        }
    }
}
