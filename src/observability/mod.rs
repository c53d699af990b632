//! Observability subsystem
//!
//! Structured JSON logging of lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on parsing or validation results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use figs_ingest::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TreesParsed, &[("trees", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

use crate::validation::ValidationResult;

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log the end of a validation pass with its error and warning counts
pub fn log_report(event: Event, result: &ValidationResult, fields: &[(&str, &str)]) {
    let counts = report_counts(result);
    log_event_with_fields(event, &with_counts(&counts, fields));
}

fn report_counts(result: &ValidationResult) -> (String, String) {
    (
        result.errors().len().to_string(),
        result.warnings().len().to_string(),
    )
}

fn with_counts<'a>(counts: &'a (String, String), fields: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut all = vec![("errors", counts.0.as_str()), ("warnings", counts.1.as_str())];
    all.extend_from_slice(fields);
    all
}
