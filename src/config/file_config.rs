//! Configuration file support for refdedupe.
//!
//! This module provides TOML configuration file parsing and writing.
//! [`load_config`](super::load_config) is the layered loader used at runtime;
//! `ConfigFile` is the plain on-disk document, used to write a starter file
//! and to read one without environment overrides.
//!
//! # Configuration File Format
//!
//! ```toml
//! [regexps]
//! doi = '(?i)\b(10\.\d{4,9}/[^\s"<>]*[^\s"<>.,;)])'
//! junk_words = '(?i)\b(?:the|a|an|of|and|in|on|for|to)\b'
//! looks_numeric = '^[0-9.\-]+$'
//! looks_numeric_whitespace = '\s+'
//! only_numeric = '[^0-9.]+'
//!
//! [string_distances]
//! jaro_winkler_min = 0.9
//! levenshtein_max = 10
//! strip_junk_words = false
//!
//! [scan]
//! event_buffer = 64
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{DedupeConfig, RegexpConfig, ScanConfig, StringDistanceConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Extraction patterns section
    #[serde(default)]
    pub regexps: RegexpConfig,

    /// Fuzzy title thresholds section
    #[serde(default)]
    pub string_distances: StringDistanceConfig,

    /// Scanner section
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Engine settings carried by this file
    pub fn dedupe_config(&self) -> DedupeConfig {
        DedupeConfig {
            regexps: self.regexps.clone(),
            string_distances: self.string_distances,
            scan: self.scan,
        }
    }
}

impl From<DedupeConfig> for ConfigFile {
    fn from(config: DedupeConfig) -> Self {
        Self {
            regexps: config.regexps,
            string_distances: config.string_distances,
            scan: config.scan,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
