//! CSV pre-flight checks
//!
//! Cheap checks run before a full parse: extension or media type, reported
//! size, and a syntax check over the first few records. Only a bounded
//! prefix of the content is ever read.

use super::file::CsvFile;
use crate::config::IngestConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::validation::{IssueCode, ValidationError, ValidationResult};

const CSV_MEDIA_TYPE: &str = "text/csv";
const MIB: u64 = 1024 * 1024;

/// Validates that `file` looks like a CSV worth parsing.
///
/// Every failed check adds an error; none short-circuits the others.
pub async fn validate_format(file: &CsvFile, config: &IngestConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !looks_like_csv(file) {
        result.push_error(
            ValidationError::new(IssueCode::CsvNotCsv, "File must be CSV format").with_field("name"),
        );
    }

    if file.size > config.max_file_size_bytes {
        result.push_error(
            ValidationError::new(
                IssueCode::CsvTooLarge,
                format!("File size exceeds {}", human_limit(config.max_file_size_bytes)),
            )
            .with_field("size"),
        );
    }

    match file.read_prefix(config.sample_bytes).await {
        Ok((prefix, truncated)) => {
            let sample = if truncated {
                drop_partial_line(&prefix)
            } else {
                &prefix[..]
            };
            check_syntax(sample, config.preview_rows, &mut result);
        }
        Err(e) => result.push_error(ValidationError::new(
            IssueCode::CsvUnreadable,
            format!("Failed to read file content: {}", e),
        )),
    }

    result.summarize(&file.name);

    let errors = result.errors().len().to_string();
    log_event_with_fields(
        Event::CsvPreflight,
        &[("errors", errors.as_str()), ("file", file.name.as_str())],
    );

    result
}

fn looks_like_csv(file: &CsvFile) -> bool {
    file.name.to_ascii_lowercase().ends_with(".csv")
        || file.media_type.as_deref() == Some(CSV_MEDIA_TYPE)
}

fn human_limit(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Cuts a truncated prefix back to its last complete line.
fn drop_partial_line(prefix: &[u8]) -> &[u8] {
    match prefix.iter().rposition(|&b| b == b'\n') {
        Some(end) => &prefix[..=end],
        None => prefix,
    }
}

/// Parses up to `rows` records strictly, one error per bad record.
fn check_syntax(sample: &[u8], rows: usize, result: &mut ValidationResult) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(sample);

    for record in reader.records().take(rows) {
        if let Err(e) = record {
            let mut error = ValidationError::new(IssueCode::CsvSyntax, e.to_string());
            if let Some(pos) = e.position() {
                error = error.with_line(pos.line() as usize);
            }
            result.push_error(error);
        }
    }
}
