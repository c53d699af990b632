//! Schema validator
//!
//! Two checks, both accumulate-and-report:
//!
//! - `validate_json`: is the schema document itself well formed?
//! - `validate_columns`: does a CSV header row satisfy a schema?
//!
//! Neither check stops at the first defect. A single call reports every
//! problem it can find so the caller can display them all at once. Each
//! call logs one event with the error and warning counts.

use serde_json::{Map, Value};

use super::types::{DataSchema, DataType};
use crate::observability::{log_report, Event};
use crate::validation::{IssueCode, ValidationError, ValidationResult, ValidationWarning};

const COLUMN_TYPES: &str = "columnTypes";
const CLAIM_ID_COLUMN: &str = "claimIdColumn";
const REQUIRED_COLUMNS: &str = "requiredColumns";
const IGNORED_COLUMNS: &str = "ignoredColumns";
const AUXILIARY_KEYS: [&str; 3] = ["scoreColumn", "classificationColumn", "exclusionReasonColumn"];

/// Stateless schema validator.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates the text of a schema document.
    ///
    /// A JSON syntax error yields exactly one error. Otherwise every
    /// structural defect is reported: missing or mistyped `columnTypes`,
    /// `claimIdColumn` and `requiredColumns`, and each column whose declared
    /// type is not one of `float64|int64|object|bool|datetime`.
    pub fn validate_json(text: &str) -> ValidationResult {
        let result = Self::check_document(text);
        log_report(Event::SchemaValidated, &result, &[]);
        result
    }

    fn check_document(text: &str) -> ValidationResult {
        let parsed: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                let error = ValidationError::new(
                    IssueCode::SchemaInvalidJson,
                    format!("Invalid JSON format: {}", e),
                )
                .with_line(e.line())
                .with_column(e.column());
                return ValidationResult::from_error(error);
            }
        };

        let Some(obj) = parsed.as_object() else {
            return ValidationResult::from_error(ValidationError::new(
                IssueCode::SchemaNotObject,
                format!("Schema must be a JSON object, got {}", json_type_name(&parsed)),
            ));
        };

        let mut result = ValidationResult::new();
        Self::check_required_keys(obj, &mut result);
        Self::check_optional_keys(obj, &mut result);

        if let Some(column_types) = obj.get(COLUMN_TYPES).and_then(Value::as_object) {
            Self::check_column_types(column_types, &mut result);
        }

        result
    }

    /// Validates a schema against the header row of a CSV file.
    ///
    /// Missing identifier or required columns are errors. Headers with no
    /// entry in the type mapping (other than the identifier) are tolerated
    /// but reported as warnings.
    pub fn validate_columns<S: AsRef<str>>(schema: &DataSchema, headers: &[S]) -> ValidationResult {
        let result = Self::check_headers(schema, headers);
        let columns = headers.len().to_string();
        log_report(Event::ColumnsValidated, &result, &[("columns", columns.as_str())]);
        result
    }

    fn check_headers<S: AsRef<str>>(schema: &DataSchema, headers: &[S]) -> ValidationResult {
        let mut result = ValidationResult::new();
        let has_header = |name: &str| headers.iter().any(|h| h.as_ref() == name);

        if !has_header(&schema.claim_id_column) {
            result.push_error(
                ValidationError::new(
                    IssueCode::ColumnIdMissing,
                    format!(
                        "Claim ID column '{}' not found in CSV headers",
                        schema.claim_id_column
                    ),
                )
                .with_field(&schema.claim_id_column),
            );
        }

        for required in &schema.required_columns {
            if !has_header(required) {
                result.push_error(
                    ValidationError::new(
                        IssueCode::ColumnRequiredMissing,
                        format!("Required column '{}' not found in CSV headers", required),
                    )
                    .with_field(required),
                );
            }
        }

        for header in headers {
            let header = header.as_ref();
            if !schema.is_mapped(header) && !schema.is_id_column(header) {
                result.push_warning(
                    ValidationWarning::new(
                        IssueCode::ColumnUnmapped,
                        format!("Column '{}' is not mapped in schema", header),
                    )
                    .with_field(header),
                );
            }
        }

        for (role, column) in schema.auxiliary_columns() {
            if !has_header(column) {
                result.push_warning(
                    ValidationWarning::new(
                        IssueCode::ColumnAuxiliaryMissing,
                        format!("{} '{}' not found in CSV headers", role, column),
                    )
                    .with_field(column),
                );
            }
        }

        result
    }

    /// Checks the three mandatory top-level keys.
    fn check_required_keys(obj: &Map<String, Value>, result: &mut ValidationResult) {
        if !matches!(obj.get(COLUMN_TYPES), Some(Value::Object(_))) {
            result.push_error(
                ValidationError::new(
                    IssueCode::SchemaMissingColumnTypes,
                    "Schema must contain columnTypes object",
                )
                .with_field(COLUMN_TYPES),
            );
        }

        match obj.get(CLAIM_ID_COLUMN) {
            Some(Value::String(s)) if !s.is_empty() => {}
            _ => result.push_error(
                ValidationError::new(
                    IssueCode::SchemaMissingClaimId,
                    "Schema must contain claimIdColumn string",
                )
                .with_field(CLAIM_ID_COLUMN),
            ),
        }

        match obj.get(REQUIRED_COLUMNS) {
            Some(Value::Array(items)) => Self::check_string_items(REQUIRED_COLUMNS, items, result),
            _ => result.push_error(
                ValidationError::new(
                    IssueCode::SchemaMissingRequiredColumns,
                    "Schema must contain requiredColumns array",
                )
                .with_field(REQUIRED_COLUMNS),
            ),
        }
    }

    /// Checks optional keys when present. Absent or null values are fine.
    fn check_optional_keys(obj: &Map<String, Value>, result: &mut ValidationResult) {
        for key in AUXILIARY_KEYS {
            match obj.get(key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(other) => result.push_error(
                    ValidationError::new(
                        IssueCode::SchemaInvalidField,
                        format!("{} must be a string, got {}", key, json_type_name(other)),
                    )
                    .with_field(key),
                ),
            }
        }

        match obj.get(IGNORED_COLUMNS) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => Self::check_string_items(IGNORED_COLUMNS, items, result),
            Some(other) => result.push_error(
                ValidationError::new(
                    IssueCode::SchemaInvalidField,
                    format!("ignoredColumns must be an array, got {}", json_type_name(other)),
                )
                .with_field(IGNORED_COLUMNS),
            ),
        }

        match obj.get("metadata") {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(other) => result.push_error(
                ValidationError::new(
                    IssueCode::SchemaInvalidField,
                    format!("metadata must be an object, got {}", json_type_name(other)),
                )
                .with_field("metadata"),
            ),
        }
    }

    fn check_string_items(key: &str, items: &[Value], result: &mut ValidationResult) {
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                result.push_error(
                    ValidationError::new(
                        IssueCode::SchemaInvalidField,
                        format!("{}[{}] must be a string, got {}", key, i, json_type_name(item)),
                    )
                    .with_field(key),
                );
            }
        }
    }

    /// Every declared type must be one of the supported names.
    fn check_column_types(column_types: &Map<String, Value>, result: &mut ValidationResult) {
        for (column, declared) in column_types {
            let valid = declared.as_str().and_then(DataType::from_name).is_some();
            if !valid {
                let shown = match declared {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                result.push_error(
                    ValidationError::new(
                        IssueCode::SchemaInvalidType,
                        format!(
                            "Invalid data type '{}' for column '{}'. Valid types: {}",
                            shown,
                            column,
                            DataType::NAMES.join(", ")
                        ),
                    )
                    .with_field(column),
                );
            }
        }
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
