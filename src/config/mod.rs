//! Configuration management.
//!
//! Settings are resolved once, when a [`Comparator`](crate::dedupe::Comparator)
//! or [`Scanner`](crate::dedupe::Scanner) is built. Every field carries a
//! serde default, so a partial file or a handful of environment variables
//! override only what they name.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError, LoggingConfig};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "refdedupe.toml";

/// Deduplication engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Pattern overrides for field extraction
    #[serde(default)]
    pub regexps: RegexpConfig,

    /// Fuzzy title thresholds
    #[serde(default)]
    pub string_distances: StringDistanceConfig,

    /// Scanner settings
    #[serde(default)]
    pub scan: ScanConfig,
}

impl DedupeConfig {
    /// Compile the configured patterns
    pub fn compile(&self) -> Result<Patterns, ConfigError> {
        Patterns::compile(&self.regexps)
    }
}

/// Regular expressions used by the field extractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexpConfig {
    /// DOI detection. Capture group 1, when present, is taken as the bare DOI.
    /// The default never ends on `.`, `,`, `;` or `)`, so citation punctuation is left out.
    #[serde(default = "default_doi")]
    pub doi: String,

    /// Filler words removed from titles when `string_distances.strip_junk_words` is on
    #[serde(default = "default_junk_words")]
    pub junk_words: String,

    /// Whole-string test for numeric-looking values
    #[serde(default = "default_looks_numeric")]
    pub looks_numeric: String,

    /// Whitespace removed before the numeric-looking test
    #[serde(default = "default_looks_numeric_whitespace")]
    pub looks_numeric_whitespace: String,

    /// Characters removed before parsing a numeric-looking value
    #[serde(default = "default_only_numeric")]
    pub only_numeric: String,
}

impl Default for RegexpConfig {
    fn default() -> Self {
        Self {
            doi: default_doi(),
            junk_words: default_junk_words(),
            looks_numeric: default_looks_numeric(),
            looks_numeric_whitespace: default_looks_numeric_whitespace(),
            only_numeric: default_only_numeric(),
        }
    }
}

fn default_doi() -> String {
    r#"(?i)\b(10\.\d{4,9}/[^\s"<>]*[^\s"<>.,;)])"#.to_string()
}

fn default_junk_words() -> String {
    r"(?i)\b(?:the|a|an|of|and|in|on|for|to)\b".to_string()
}

fn default_looks_numeric() -> String {
    r"^[0-9.\-]+$".to_string()
}

fn default_looks_numeric_whitespace() -> String {
    r"\s+".to_string()
}

fn default_only_numeric() -> String {
    r"[^0-9.]+".to_string()
}

/// String distance thresholds for the fuzzy title stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StringDistanceConfig {
    /// Minimum Jaro-Winkler similarity for two titles to be close
    #[serde(default = "default_jaro_winkler_min")]
    pub jaro_winkler_min: f64,

    /// Maximum Levenshtein distance for two titles to be close
    #[serde(default = "default_levenshtein_max")]
    pub levenshtein_max: usize,

    /// Remove junk words from both titles before measuring them
    #[serde(default)]
    pub strip_junk_words: bool,
}

impl Default for StringDistanceConfig {
    fn default() -> Self {
        Self {
            jaro_winkler_min: default_jaro_winkler_min(),
            levenshtein_max: default_levenshtein_max(),
            strip_junk_words: false,
        }
    }
}

fn default_jaro_winkler_min() -> f64 {
    0.9
}

fn default_levenshtein_max() -> usize {
    10
}

/// Scanner configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Capacity of the event channel behind a scan handle
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    64
}

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct Patterns {
    pub doi: Regex,
    pub junk_words: Regex,
    pub looks_numeric: Regex,
    pub looks_numeric_whitespace: Regex,
    pub only_numeric: Regex,
}

impl Patterns {
    /// Compile every pattern, reporting the first one that fails
    pub fn compile(regexps: &RegexpConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            doi: compile_pattern("doi", &regexps.doi)?,
            junk_words: compile_pattern("junk_words", &regexps.junk_words)?,
            looks_numeric: compile_pattern("looks_numeric", &regexps.looks_numeric)?,
            looks_numeric_whitespace: compile_pattern(
                "looks_numeric_whitespace",
                &regexps.looks_numeric_whitespace,
            )?,
            only_numeric: compile_pattern("only_numeric", &regexps.only_numeric)?,
        })
    }
}

impl Default for Patterns {
    fn default() -> Self {
        // The built-in patterns are constants covered by tests.
        Self::compile(&RegexpConfig::default()).expect("default patterns are valid")
    }
}

fn compile_pattern(name: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| {
        tracing::warn!("Rejected {} pattern override: {}", name, source);
        ConfigError::InvalidPattern { name, source }
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name} pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Load configuration from a file, with `REFDEDUPE_*` environment overrides
///
/// Nested keys use a double underscore, e.g.
/// `REFDEDUPE_STRING_DISTANCES__LEVENSHTEIN_MAX=5`.
pub fn load_config(path: &Path) -> Result<DedupeConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Get configuration from environment variables over the defaults
pub fn get_config() -> Result<DedupeConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(env_source())
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("REFDEDUPE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("refdedupe").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
