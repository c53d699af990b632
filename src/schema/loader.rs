//! Schema loading
//!
//! A schema document is validated before it is decoded. Decoding a
//! document that failed validation is never attempted, so callers get the
//! full validation report instead of the first serde error.

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::DataSchema;
use super::validator::SchemaValidator;
use crate::observability::{log_event_with_fields, Event};

/// Validates and decodes a schema document.
pub fn parse_schema(text: &str) -> SchemaResult<DataSchema> {
    let report = SchemaValidator::validate_json(text);
    if !report.is_valid() {
        return Err(SchemaError::Invalid(report));
    }

    let schema: DataSchema = serde_json::from_str(text)?;

    let columns = schema.column_types.len().to_string();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[
            ("claim_id_column", schema.claim_id_column.as_str()),
            ("columns", columns.as_str()),
        ],
    );

    Ok(schema)
}

/// Reads a schema file from disk and passes it through `parse_schema`.
pub fn load_schema_file(path: &Path) -> SchemaResult<DataSchema> {
    let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_schema(&content)
}
