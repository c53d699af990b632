//! Observability events
//!
//! Every lifecycle step the crate logs is listed here. Events are explicit
//! and typed; free-form event names are not used.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Ingest configuration loaded
    ConfigLoaded,

    // Schema
    /// Schema document decoded
    SchemaLoaded,
    /// Schema document validated
    SchemaValidated,
    /// Schema checked against CSV headers
    ColumnsValidated,

    // CSV
    /// Pre-flight format check finished
    CsvPreflight,
    /// Full CSV parse begins
    CsvParseBegin,
    /// Full CSV parse produced records
    CsvParseComplete,
    /// Full CSV parse rejected
    CsvParseRejected,

    // Trees
    /// Tree dump parsed into a forest
    TreesParsed,
    /// Tree dump rejected
    TreesRejected,
    /// Forest validated
    TreesValidated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaValidated => "SCHEMA_VALIDATED",
            Event::ColumnsValidated => "COLUMNS_VALIDATED",

            Event::CsvPreflight => "CSV_PREFLIGHT",
            Event::CsvParseBegin => "CSV_PARSE_BEGIN",
            Event::CsvParseComplete => "CSV_PARSE_COMPLETE",
            Event::CsvParseRejected => "CSV_PARSE_REJECTED",

            Event::TreesParsed => "TREES_PARSED",
            Event::TreesRejected => "TREES_REJECTED",
            Event::TreesValidated => "TREES_VALIDATED",
        }
    }

    /// Returns true if this event reports a rejected operation
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::CsvParseRejected | Event::TreesRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
