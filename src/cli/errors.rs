//! CLI-specific error types
//!
//! Every library error is mapped to one CLI code. The underlying error code
//! is kept as the message prefix.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::ingest::IngestError;
use crate::schema::SchemaError;
use crate::tree::TreeParseError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout, runtime)
    IoError,
    /// Schema could not be loaded
    SchemaError,
    /// CSV could not be parsed
    IngestError,
    /// Tree dump could not be parsed
    TreeError,
    /// A validation report was written and it is not valid
    ValidationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FIGS_CLI_CONFIG_ERROR",
            Self::IoError => "FIGS_CLI_IO_ERROR",
            Self::SchemaError => "FIGS_CLI_SCHEMA_ERROR",
            Self::IngestError => "FIGS_CLI_INGEST_ERROR",
            Self::TreeError => "FIGS_CLI_TREE_ERROR",
            Self::ValidationFailed => "FIGS_CLI_VALIDATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Validation report already written, exit non-zero
    pub fn validation_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ValidationFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether stdout already carries the details of this failure
    pub fn is_reported(&self) -> bool {
        self.code == CliErrorCode::ValidationFailed
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("{}: {}", e.code(), e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        let detail = match e.report() {
            Some(report) => report
                .errors()
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            None => e.to_string(),
        };
        Self::new(CliErrorCode::SchemaError, format!("{}: {}", e.code(), detail))
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::new(CliErrorCode::IngestError, format!("{}: {}", e.code(), e))
    }
}

impl From<TreeParseError> for CliError {
    fn from(e: TreeParseError) -> Self {
        Self::new(CliErrorCode::TreeError, format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
