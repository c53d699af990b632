//! CSV ingest errors
//!
//! A full parse either yields every record or fails with exactly one of
//! these. Per-cell problems are warnings, not errors.

use thiserror::Error;

/// Result type for CSV ingest
pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Claim ID column '{column}' not found in CSV headers")]
    MissingIdColumn { column: String },

    #[error("CSV parse cancelled")]
    Cancelled,
}

impl IngestError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Io { .. } => "INGEST_IO",
            IngestError::Csv(_) => "INGEST_CSV",
            IngestError::MissingIdColumn { .. } => "INGEST_MISSING_ID_COLUMN",
            IngestError::Cancelled => "INGEST_CANCELLED",
        }
    }
}
