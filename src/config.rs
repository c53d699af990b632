//! Ingest configuration
//!
//! Limits for CSV pre-flight checks and the policies used by the tree dump
//! parser. Every key is optional in the JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::tree::{LinePolicy, OverflowPolicy, ParseOptions};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Decode(_) => "CONFIG_DECODE",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Largest CSV accepted by pre-flight (default: 500 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Bytes read from the head of a CSV for the syntax check (default: 1024)
    #[serde(default = "default_sample_bytes")]
    pub sample_bytes: usize,

    /// Records parsed by the syntax check (default: 5)
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Tree dump line policy (default: "warn")
    #[serde(default)]
    pub line_policy: LinePolicy,

    /// Tree dump child overflow policy (default: "reject")
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
}

fn default_max_file_size() -> u64 {
    500 * 1024 * 1024
}
fn default_sample_bytes() -> usize {
    1024
}
fn default_preview_rows() -> usize {
    5
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            sample_bytes: default_sample_bytes(),
            preview_rows: default_preview_rows(),
            line_policy: LinePolicy::default(),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: IngestConfig = serde_json::from_str(&content)?;
        config.validate()?;

        let max = config.max_file_size_bytes.to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("max_file_size_bytes", max.as_str())]);

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_file_size_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_file_size_bytes must be > 0".to_string(),
            ));
        }
        if self.sample_bytes == 0 {
            return Err(ConfigError::Invalid("sample_bytes must be > 0".to_string()));
        }
        Ok(())
    }

    /// Tree parser options derived from the configured policies
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            line_policy: self.line_policy,
            overflow_policy: self.overflow_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.max_file_size_bytes, 524_288_000);
        assert_eq!(config.sample_bytes, 1024);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(IngestConfig::load(&path).unwrap(), IngestConfig::default());
    }

    #[test]
    fn test_policies_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"line_policy": "lenient", "overflow_policy": "ignore", "preview_rows": 2}"#,
        )
        .unwrap();

        let config = IngestConfig::load(&path).unwrap();
        assert_eq!(config.preview_rows, 2);
        assert_eq!(config.parse_options(), ParseOptions::lenient());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"sample_bytes": 0}"#).unwrap();

        let err = IngestConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_unknown_policy_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"line_policy": "loud"}"#).unwrap();

        assert_eq!(IngestConfig::load(&path).unwrap_err().code(), "CONFIG_DECODE");
    }
}
