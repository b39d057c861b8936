use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::models::{Settings, SettingsError};

/// Settings key holding the logging section
pub const LOGGING_KEY: &str = "logging";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (json, pretty)
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stderr)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogConfig {
    /// Read the `logging` section, falling back to defaults when it is absent
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        match settings.get(LOGGING_KEY) {
            Err(SettingsError::MissingKey(_)) => Ok(Self::default()),
            result => result,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
