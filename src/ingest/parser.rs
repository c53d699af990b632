//! Full CSV parse into typed records
//!
//! The header row names the columns. Each later non-blank row becomes one
//! `Record`: the identifier column becomes `id`, auxiliary columns fill the
//! record's score, classification and exclusion reason, and every other
//! non-ignored column is coerced into the feature map.
//!
//! Any csv-level failure (I/O, invalid UTF-8) rejects the whole file. Cell
//! coercion problems are warnings.

use std::collections::HashSet;

use tokio::sync::watch;

use super::coerce::{coerce_cell, coerce_score};
use super::errors::{IngestError, IngestResult};
use super::file::CsvFile;
use super::record::{ParsedDataset, Record};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::DataSchema;
use crate::validation::{IssueCode, ValidationWarning};

/// Rows decoded between yields to the runtime
pub const YIELD_EVERY: usize = 256;

/// Parses the whole file against `schema`.
pub async fn parse_file(file: &CsvFile, schema: &DataSchema) -> IngestResult<ParsedDataset> {
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    parse_file_with_cancel(file, schema, &cancel_rx).await
}

/// Like [`parse_file`], but gives up with `IngestError::Cancelled` as soon
/// as `cancel` reads `true`. The signal is checked between rows, and the
/// parse yields to the runtime every [`YIELD_EVERY`] rows so a task on the
/// same thread can raise it.
pub async fn parse_file_with_cancel(
    file: &CsvFile,
    schema: &DataSchema,
    cancel: &watch::Receiver<bool>,
) -> IngestResult<ParsedDataset> {
    let size = file.size.to_string();
    log_event_with_fields(
        Event::CsvParseBegin,
        &[("file", file.name.as_str()), ("size", size.as_str())],
    );

    let outcome = match file.read_all().await {
        Ok(bytes) => decode(&bytes, schema, cancel).await,
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(dataset) => {
            let records = dataset.records.len().to_string();
            let warnings = dataset.warnings.len().to_string();
            log_event_with_fields(
                Event::CsvParseComplete,
                &[
                    ("file", file.name.as_str()),
                    ("records", records.as_str()),
                    ("warnings", warnings.as_str()),
                ],
            );
        }
        Err(e) => log_event_with_fields(
            Event::CsvParseRejected,
            &[("code", e.code()), ("file", file.name.as_str())],
        ),
    }

    outcome
}

/// Column roles resolved once from the header row
enum Role {
    Id,
    Ignored,
    Score,
    Classification,
    ExclusionReason,
    Feature,
}

fn role_of(schema: &DataSchema, header: &str) -> Role {
    if schema.is_id_column(header) {
        Role::Id
    } else if schema.score_column.as_deref() == Some(header) {
        Role::Score
    } else if schema.classification_column.as_deref() == Some(header) {
        Role::Classification
    } else if schema.exclusion_reason_column.as_deref() == Some(header) {
        Role::ExclusionReason
    } else if schema.is_ignored(header) {
        Role::Ignored
    } else {
        Role::Feature
    }
}

async fn decode(
    bytes: &[u8],
    schema: &DataSchema,
    cancel: &watch::Receiver<bool>,
) -> IngestResult<ParsedDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let Some(id_index) = headers.iter().position(|h| schema.is_id_column(h)) else {
        return Err(IngestError::MissingIdColumn {
            column: schema.claim_id_column.clone(),
        });
    };
    let roles: Vec<Role> = headers.iter().map(|h| role_of(schema, h)).collect();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (index, row) in reader.records().enumerate() {
        if index > 0 && index % YIELD_EVERY == 0 {
            tokio::task::yield_now().await;
        }
        if *cancel.borrow() {
            return Err(IngestError::Cancelled);
        }
        let row = row?;
        // Header is line 1; fall back to row order if the reader lost track.
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);

        let id = row.get(id_index).unwrap_or_default().to_string();
        if !seen.insert(id.clone()) {
            warnings.push(
                ValidationWarning::new(
                    IssueCode::RecordDuplicateId,
                    format!("Duplicate claim ID '{}'", id),
                )
                .with_field(&schema.claim_id_column)
                .with_line(line),
            );
        }
        let mut record = Record::new(id);

        for (column, (header, role)) in headers.iter().zip(&roles).enumerate() {
            let cell = row.get(column);
            let issue = match role {
                Role::Id | Role::Ignored => None,
                Role::Score => {
                    let (score, issue) = coerce_score(cell.unwrap_or_default());
                    record.score = score;
                    issue
                }
                Role::Classification => {
                    record.classification = non_empty(cell);
                    None
                }
                Role::ExclusionReason => {
                    record.exclusion_reason = non_empty(cell);
                    None
                }
                Role::Feature => {
                    let (value, issue) = coerce_cell(cell, schema.column_type(header));
                    record.features.insert(header.clone(), value);
                    issue
                }
            };

            if let Some(code) = issue {
                warnings.push(cell_warning(code, header, cell.unwrap_or_default(), line));
            }
        }

        records.push(record);
    }

    Ok(ParsedDataset {
        headers,
        records,
        warnings,
    })
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn cell_warning(code: IssueCode, column: &str, raw: &str, line: usize) -> ValidationWarning {
    let expected = match code {
        IssueCode::CellNotBoolean => "a boolean",
        IssueCode::CellNotDatetime => "a datetime",
        _ => "a number",
    };
    ValidationWarning::new(
        code,
        format!("Value '{}' in column '{}' is not {}", raw, column, expected),
    )
    .with_field(column)
    .with_line(line)
}
