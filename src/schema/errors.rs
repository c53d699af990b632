//! Schema loading errors
//!
//! Error codes:
//! - SCHEMA_IO (reading the schema file failed)
//! - SCHEMA_INVALID (document failed validation, full report attached)
//! - SCHEMA_DECODE (document passed validation but could not be decoded)

use thiserror::Error;

use crate::validation::ValidationResult;

/// Result type for schema loading
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema loading error
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema is invalid: {} error(s)", .0.errors().len())]
    Invalid(ValidationResult),

    #[error("Schema could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SchemaError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Io { .. } => "SCHEMA_IO",
            SchemaError::Invalid(_) => "SCHEMA_INVALID",
            SchemaError::Decode(_) => "SCHEMA_DECODE",
        }
    }

    /// Returns the validation report for an invalid schema
    pub fn report(&self) -> Option<&ValidationResult> {
        match self {
            SchemaError::Invalid(result) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{IssueCode, ValidationError};

    #[test]
    fn test_invalid_carries_report() {
        let report = ValidationResult::from_error(ValidationError::new(
            IssueCode::SchemaMissingClaimId,
            "missing",
        ));
        let err = SchemaError::Invalid(report);
        assert_eq!(err.code(), "SCHEMA_INVALID");
        assert_eq!(err.report().unwrap().errors().len(), 1);
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn test_io_display_names_path() {
        let err = SchemaError::Io {
            path: "/tmp/schema.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/schema.json"));
        assert!(err.report().is_none());
    }
}
