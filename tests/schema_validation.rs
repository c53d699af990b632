//! Schema Validation Tests
//!
//! - Every structural defect of a schema document is reported at once
//! - JSON syntax errors are a single error
//! - Header checks tolerate unmapped columns but not missing required ones
//! - Validation is deterministic

use figs_ingest::schema::{load_schema_file, parse_schema, DataType, SchemaValidator};
use figs_ingest::validation::{IssueCategory, IssueCode};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn claims_schema() -> serde_json::Value {
    json!({
        "columnTypes": {
            "claim_id": "object",
            "amount": "float64",
            "visits": "int64",
            "urgent": "bool",
            "filed": "datetime"
        },
        "claimIdColumn": "claim_id",
        "requiredColumns": ["claim_id", "amount"],
        "scoreColumn": "score",
        "metadata": {"name": "claims", "version": "1"}
    })
}

fn codes(result: &figs_ingest::validation::ValidationResult) -> Vec<IssueCode> {
    result.errors().iter().filter_map(|e| e.code).collect()
}

// =============================================================================
// Document Tests
// =============================================================================

#[test]
fn test_valid_schema_has_no_errors() {
    let result = SchemaValidator::validate_json(&claims_schema().to_string());
    assert!(result.is_valid());
    assert!(result.errors().is_empty());
}

#[test]
fn test_invalid_json_is_one_error() {
    let result = SchemaValidator::validate_json("{ invalid json");
    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].message.starts_with("Invalid JSON format"));
    assert_eq!(result.errors()[0].line, Some(1));
}

#[test]
fn test_every_defect_is_reported() {
    let doc = json!({
        "columnTypes": {"a": "text", "b": "float64", "c": "string"},
        "claimIdColumn": "",
    });
    let result = SchemaValidator::validate_json(&doc.to_string());

    let codes = codes(&result);
    assert!(codes.contains(&IssueCode::SchemaMissingClaimId));
    assert!(codes.contains(&IssueCode::SchemaMissingRequiredColumns));
    assert_eq!(
        codes
            .iter()
            .filter(|c| **c == IssueCode::SchemaInvalidType)
            .count(),
        2
    );

    let invalid_a = result
        .errors()
        .iter()
        .find(|e| e.field.as_deref() == Some("a"))
        .unwrap();
    assert_eq!(
        invalid_a.message,
        "Invalid data type 'text' for column 'a'. Valid types: float64, int64, object, bool, datetime"
    );
}

#[test]
fn test_non_object_document() {
    let result = SchemaValidator::validate_json("[1, 2, 3]");
    assert_eq!(codes(&result), vec![IssueCode::SchemaNotObject]);
}

#[test]
fn test_issue_categories() {
    assert_eq!(
        IssueCode::SchemaInvalidJson.category(),
        IssueCategory::MalformedInput
    );
    assert_eq!(
        IssueCode::ColumnRequiredMissing.category(),
        IssueCategory::SchemaMismatch
    );
}

#[test]
fn test_validation_is_deterministic() {
    let doc = json!({"columnTypes": {"a": "text"}, "requiredColumns": "a"}).to_string();
    let first = SchemaValidator::validate_json(&doc);
    for _ in 0..50 {
        assert_eq!(SchemaValidator::validate_json(&doc).errors(), first.errors());
    }
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_headers_satisfy_schema() {
    let schema = parse_schema(&claims_schema().to_string()).unwrap();
    let headers = ["claim_id", "amount", "visits", "urgent", "filed", "score"];

    let result = SchemaValidator::validate_columns(&schema, &headers);
    assert!(result.is_valid());
    // score is auxiliary, not typed
    assert_eq!(result.warnings().len(), 1);
    assert_eq!(result.warnings()[0].field.as_deref(), Some("score"));
}

#[test]
fn test_missing_identifier_and_required_columns() {
    let schema = parse_schema(&claims_schema().to_string()).unwrap();
    let headers = vec!["visits".to_string(), "extra".to_string()];

    let result = SchemaValidator::validate_columns(&schema, &headers);
    assert_eq!(
        codes(&result),
        vec![
            IssueCode::ColumnIdMissing,
            IssueCode::ColumnRequiredMissing,
            IssueCode::ColumnRequiredMissing,
        ]
    );
    assert!(result.has_warning(IssueCode::ColumnUnmapped));
    assert!(result.has_warning(IssueCode::ColumnAuxiliaryMissing));
}

// =============================================================================
// Loader Tests
// =============================================================================

#[test]
fn test_load_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("schema.json");
    std::fs::write(&path, claims_schema().to_string()).unwrap();

    let schema = load_schema_file(&path).unwrap();
    assert_eq!(schema.claim_id_column, "claim_id");
    assert_eq!(schema.column_type("filed"), Some(DataType::Datetime));
    assert_eq!(schema.score_column.as_deref(), Some("score"));
}

#[test]
fn test_invalid_document_is_not_decoded() {
    let err = parse_schema(r#"{"claimIdColumn": "id"}"#).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_INVALID");
    let report = err.report().unwrap();
    assert!(report.has_error(IssueCode::SchemaMissingColumnTypes));
}
