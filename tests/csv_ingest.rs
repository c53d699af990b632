//! CSV Ingest Tests
//!
//! - Pre-flight accumulates extension, size and syntax errors
//! - Oversized files are rejected from the reported size alone
//! - Full parses coerce cells by declared type
//! - A rejected parse returns no records

use figs_ingest::config::IngestConfig;
use figs_ingest::ingest::{
    coerce_cell, parse_file, parse_file_with_cancel, validate_format, CsvFile, FeatureValue,
    IngestError,
};
use figs_ingest::schema::{parse_schema, DataSchema, DataType};
use figs_ingest::validation::IssueCode;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;

// =============================================================================
// Helper Functions
// =============================================================================

fn claims_schema() -> DataSchema {
    parse_schema(
        &json!({
            "columnTypes": {
                "claim_id": "object",
                "amount": "float64",
                "visits": "int64",
                "urgent": "bool"
            },
            "claimIdColumn": "claim_id",
            "requiredColumns": ["claim_id", "amount"],
            "classificationColumn": "label"
        })
        .to_string(),
    )
    .unwrap()
}

async fn on_disk(tmp: &TempDir, name: &str, content: &str) -> CsvFile {
    let path = tmp.path().join(name);
    std::fs::write(&path, content).unwrap();
    CsvFile::from_path(&path).await.unwrap()
}

// =============================================================================
// Coercion Tests
// =============================================================================

#[test]
fn test_one_is_true_under_bool() {
    let (value, issue) = coerce_cell(Some("1"), Some(DataType::Bool));
    assert_eq!(value, FeatureValue::Bool(true));
    assert!(issue.is_none());
}

#[test]
fn test_text_under_float_is_nan_with_warning() {
    let (value, issue) = coerce_cell(Some("abc"), Some(DataType::Float64));
    assert!(value.as_number().unwrap().is_nan());
    assert_eq!(issue, Some(IssueCode::CellNotNumeric));
}

#[test]
fn test_infinity_under_float_is_nan_with_warning() {
    let (value, issue) = coerce_cell(Some("infinity"), Some(DataType::Float64));
    assert!(value.as_number().unwrap().is_nan());
    assert_eq!(issue, Some(IssueCode::CellNotNumeric));
}

// =============================================================================
// Pre-flight Tests
// =============================================================================

#[tokio::test]
async fn test_600_mib_file_rejected_by_size() {
    let file = CsvFile::from_bytes("claims.csv", b"claim_id,amount\nC1,1\n".to_vec())
        .with_reported_size(600 * 1024 * 1024);

    let result = validate_format(&file, &IngestConfig::default()).await;
    assert!(!result.is_valid());
    assert!(result.has_error(IssueCode::CsvTooLarge));
}

#[tokio::test]
async fn test_preflight_on_disk() {
    let tmp = TempDir::new().unwrap();
    let file = on_disk(&tmp, "claims.csv", "claim_id,amount\nC1,1\nC2,2\n").await;

    let result = validate_format(&file, &IngestConfig::default()).await;
    assert!(result.is_valid());
}

#[tokio::test]
async fn test_configured_size_limit() {
    let tmp = TempDir::new().unwrap();
    let file = on_disk(&tmp, "claims.csv", "claim_id,amount\nC1,1\nC2,2\n").await;

    let config = IngestConfig {
        max_file_size_bytes: 8,
        ..IngestConfig::default()
    };
    let result = validate_format(&file, &config).await;
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message, "File size exceeds 8 bytes");
}

#[tokio::test]
async fn test_preflight_reads_only_the_sample() {
    let tmp = TempDir::new().unwrap();
    let mut content = String::from("claim_id,amount\n");
    for i in 0..5000 {
        content.push_str(&format!("C{},{}\n", i, i));
    }
    // A ragged row far past the sample window
    content.push_str("C-last\n");
    let file = on_disk(&tmp, "claims.csv", &content).await;

    let result = validate_format(&file, &IngestConfig::default()).await;
    assert!(result.is_valid());
}

// =============================================================================
// Full Parse Tests
// =============================================================================

#[tokio::test]
async fn test_parse_claims_file() {
    let tmp = TempDir::new().unwrap();
    let file = on_disk(
        &tmp,
        "claims.csv",
        "claim_id,amount,visits,urgent,label\n\
         C1,100.5,2.9,1,fraud\n\
         C2,abc,1,0,\n",
    )
    .await;

    let data = parse_file(&file, &claims_schema()).await.unwrap();
    assert_eq!(data.records.len(), 2);

    let first = &data.records[0];
    assert_eq!(first.id, "C1");
    assert_eq!(first.feature("amount"), Some(&FeatureValue::Number(100.5)));
    assert_eq!(first.feature("visits"), Some(&FeatureValue::Number(2.0)));
    assert_eq!(first.feature("urgent"), Some(&FeatureValue::Bool(true)));
    assert_eq!(first.classification.as_deref(), Some("fraud"));
    assert!(first.feature("label").is_none());

    let second = &data.records[1];
    assert!(second
        .feature("amount")
        .and_then(FeatureValue::as_number)
        .unwrap()
        .is_nan());
    assert_eq!(second.feature("urgent"), Some(&FeatureValue::Bool(false)));
    assert_eq!(second.classification, None);

    assert_eq!(data.warnings.len(), 1);
    assert_eq!(data.warnings[0].code, Some(IssueCode::CellNotNumeric));
    assert_eq!(data.warnings[0].line, Some(3));
}

#[tokio::test]
async fn test_malformed_file_returns_no_records() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("claims.csv");
    let mut bytes = b"claim_id,amount\nC1,1\n".to_vec();
    bytes.extend_from_slice(b"C2,\xc3\x28\n");
    std::fs::write(&path, bytes).unwrap();

    let file = CsvFile::from_path(&path).await.unwrap();
    let err = parse_file(&file, &claims_schema()).await.unwrap_err();
    assert!(matches!(err, IngestError::Csv(_)));
}

#[tokio::test]
async fn test_missing_identifier_column() {
    let file = CsvFile::from_bytes("claims.csv", b"amount\n1\n".to_vec());
    let err = parse_file(&file, &claims_schema()).await.unwrap_err();
    assert_eq!(err.code(), "INGEST_MISSING_ID_COLUMN");
}

#[tokio::test]
async fn test_cancellation() {
    let (tx, rx) = watch::channel(false);
    let file = CsvFile::from_bytes("claims.csv", b"claim_id,amount\nC1,1\n".to_vec());

    let data = parse_file_with_cancel(&file, &claims_schema(), &rx)
        .await
        .unwrap();
    assert_eq!(data.records.len(), 1);

    tx.send(true).unwrap();
    let err = parse_file_with_cancel(&file, &claims_schema(), &rx)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Cancelled));
}

#[tokio::test(flavor = "current_thread")]
async fn test_cancel_raised_mid_parse_by_sibling_task() {
    let mut content = String::from("claim_id,amount\n");
    for i in 0..200_000 {
        content.push_str(&format!("C{},{}\n", i, i));
    }
    let file = CsvFile::from_bytes("claims.csv", content.into_bytes());
    let schema = claims_schema();
    let (tx, rx) = watch::channel(false);

    let (outcome, _) = tokio::join!(parse_file_with_cancel(&file, &schema, &rx), async {
        tokio::task::yield_now().await;
        tx.send(true).unwrap();
    });
    assert!(matches!(outcome, Err(IngestError::Cancelled)));
}
