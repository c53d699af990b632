//! CLI command implementations
//!
//! Each command builds one JSON payload. Commands that produce a validation
//! report still succeed in writing it; an invalid report makes the process
//! exit non-zero afterwards.

use std::fs;
use std::future::Future;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::IngestConfig;
use crate::ingest::{parse_file, validate_format, CsvFile, IngestError};
use crate::observability::{Logger, Severity};
use crate::schema::{load_schema_file, DataSchema, SchemaValidator};
use crate::tree::{TreeParser, TreeValidator};
use crate::validation::ValidationResult;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Bytes read from the head of a CSV to find its header row
const HEADER_SAMPLE_BYTES: usize = 64 * 1024;

/// Payload of a finished command
#[derive(Debug)]
pub struct Outcome {
    pub data: Value,
    /// False when the payload carries a failed validation report
    pub valid: bool,
    summary: String,
}

impl Outcome {
    fn report(mut data: Value, result: &ValidationResult) -> Self {
        if let Value::Object(map) = &mut data {
            map.insert("isValid".to_string(), json!(result.is_valid()));
        }
        Self {
            data,
            valid: result.is_valid(),
            summary: result.summary().unwrap_or_default().to_string(),
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let result = run_command(&cli);

    if let Err(e) = &result {
        if !e.is_reported() {
            write_error(e.code_str(), e.message())?;
        }
    }
    result
}

/// Run a parsed command line and write its response
pub fn run_command(cli: &Cli) -> CliResult<()> {
    if let Some(level) = &cli.log_level {
        let severity = Severity::from_name(level)
            .ok_or_else(|| CliError::config_error(format!("Unknown log level '{}'", level)))?;
        Logger::set_min_severity(severity);
    }

    let config = match &cli.config {
        Some(path) => IngestConfig::load(path)?,
        None => IngestConfig::default(),
    };

    let outcome = execute(&cli.command, &config)?;
    write_response(outcome.data)?;

    if outcome.valid {
        Ok(())
    } else {
        Err(CliError::validation_failed(outcome.summary))
    }
}

/// Runs one command without writing anything to stdout
pub fn execute(command: &Command, config: &IngestConfig) -> CliResult<Outcome> {
    match command {
        Command::Schema { schema } => schema_command(schema),
        Command::Columns { schema, data } => columns(schema, data),
        Command::Preflight { data, media_type } => {
            block_on(preflight(data, media_type.as_deref(), config))?
        }
        Command::Ingest { data, schema } => block_on(ingest(data, schema, config))?,
        Command::Trees { dump, schema } => block_on(trees(dump, schema.as_deref(), config))?,
    }
}

fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(rt.block_on(future))
}

/// Validate a schema document
fn schema_command(path: &Path) -> CliResult<Outcome> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut result = SchemaValidator::validate_json(&text);
    result.summarize("Schema");

    Ok(Outcome::report(
        json!({"validation": serde_json::to_value(&result)?}),
        &result,
    ))
}

/// Check a CSV header row against a schema
fn columns(schema_path: &Path, data: &Path) -> CliResult<Outcome> {
    let schema = load_schema_file(schema_path)?;
    let headers = block_on(read_headers(data))??;

    let mut result = SchemaValidator::validate_columns(&schema, &headers);
    result.summarize("Columns");

    Ok(Outcome::report(
        json!({"headers": headers, "validation": serde_json::to_value(&result)?}),
        &result,
    ))
}

async fn read_headers(data: &Path) -> Result<Vec<String>, IngestError> {
    let file = CsvFile::from_path(data).await?;
    let (prefix, _) = file
        .read_prefix(HEADER_SAMPLE_BYTES)
        .await
        .map_err(|e| IngestError::Io {
            name: file.name.clone(),
            source: e,
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(prefix.as_slice());
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

async fn preflight(
    data: &Path,
    media_type: Option<&str>,
    config: &IngestConfig,
) -> CliResult<Outcome> {
    let mut file = CsvFile::from_path(data).await?;
    if let Some(media_type) = media_type {
        file = file.with_media_type(media_type);
    }

    let result = validate_format(&file, config).await;
    Ok(Outcome::report(
        json!({"file": file.name, "size": file.size, "validation": serde_json::to_value(&result)?}),
        &result,
    ))
}

/// Pre-flight, then a full parse when pre-flight passes
async fn ingest(data: &Path, schema_path: &Path, config: &IngestConfig) -> CliResult<Outcome> {
    let schema = load_schema_file(schema_path)?;
    let file = CsvFile::from_path(data).await?;

    let result = validate_format(&file, config).await;
    if !result.is_valid() {
        return Ok(Outcome::report(
            json!({"validation": serde_json::to_value(&result)?}),
            &result,
        ));
    }

    let dataset = parse_file(&file, &schema).await?;
    Ok(Outcome::report(
        json!({
            "headers": dataset.headers,
            "records": dataset.records,
            "warnings": dataset.warnings,
        }),
        &result,
    ))
}

/// Parse a tree dump and validate the forest
async fn trees(
    dump: &Path,
    schema_path: Option<&Path>,
    config: &IngestConfig,
) -> CliResult<Outcome> {
    let schema: Option<DataSchema> = schema_path.map(load_schema_file).transpose()?;

    let parsed = TreeParser::new(config.parse_options())
        .parse_file(dump)
        .await?;
    let result = TreeValidator::validate(&parsed.forest, schema.as_ref());

    Ok(Outcome::report(
        json!({
            "forest": parsed.forest,
            "warnings": parsed.warnings,
            "validation": serde_json::to_value(&result)?,
        }),
        &result,
    ))
}
