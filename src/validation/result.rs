//! Validation result types
//!
//! A `ValidationResult` is the accumulate-and-report outcome of a check:
//! every detected defect is recorded, nothing aborts the scan. Validity is
//! derived from the error list and can never disagree with it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::codes::IssueCode;

/// A single fatal validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Human-readable message, suitable for direct display
    pub message: String,
    /// Field (column, feature) the error refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// 1-based line number in the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column number in the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Machine-readable code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<IssueCode>,
}

impl ValidationError {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            line: None,
            column: None,
            code: Some(code),
        }
    }

    /// Attach the offending field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a source line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach a source column number
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{}: ", code)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

/// A non-fatal validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<IssueCode>,
}

impl ValidationWarning {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            line: None,
            code: Some(code),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{}: ", code)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

/// Outcome of a validation pass.
///
/// `is_valid()` is true if and only if no error was recorded. Warnings never
/// affect validity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

impl ValidationResult {
    /// Creates an empty, valid result
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            summary: None,
        }
    }

    /// Creates a result holding a single error
    pub fn from_error(error: ValidationError) -> Self {
        let mut result = Self::new();
        result.push_error(error);
        result
    }

    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.is_valid = false;
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Appends another result's errors and warnings, preserving order
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.push_error(error);
        }
        self.warnings.extend(other.warnings);
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns true if any error carries the given code
    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|e| e.code == Some(code))
    }

    /// Returns true if any warning carries the given code
    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|w| w.code == Some(code))
    }

    /// Builds the default one-line summary from the current counts
    pub fn summarize(&mut self, subject: &str) {
        let summary = if self.is_valid {
            format!("{} is valid ({} warning(s))", subject, self.warnings.len())
        } else {
            format!(
                "{} is invalid: {} error(s), {} warning(s)",
                subject,
                self.errors.len(),
                self.warnings.len()
            )
        };
        self.summary = Some(summary);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}
