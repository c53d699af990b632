//! CSV ingest
//!
//! Two entry points:
//!
//! - `validate_format`: bounded pre-flight checks, accumulate-and-report
//! - `parse_file`: full parse into typed `Record`s, fail-fast on csv errors
//!
//! # Design Principles
//!
//! - Pre-flight never reads more than the configured sample
//! - A rejected parse returns no records at all
//! - Coercion problems are warnings attached to the dataset
//! - Cancellation is checked between rows

mod coerce;
mod errors;
mod file;
mod parser;
mod preflight;
mod record;

pub use coerce::coerce_cell;
pub use errors::{IngestError, IngestResult};
pub use file::CsvFile;
pub use parser::{parse_file, parse_file_with_cancel, YIELD_EVERY};
pub use preflight::validate_format;
pub use record::{FeatureValue, ParsedDataset, Record};
