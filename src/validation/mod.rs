//! Validation results shared by every checker
//!
//! Two error policies coexist in this crate:
//!
//! - Accumulate-and-report: validators return a `ValidationResult` listing
//!   every defect found, in traversal order.
//! - Fail-fast: parsers that cannot produce output return a single error
//!   (`IngestError`, `TreeParseError`, `SchemaError`).
//!
//! This module holds the first kind.

mod codes;
mod result;

pub use codes::{IssueCategory, IssueCode};
pub use result::{ValidationError, ValidationResult, ValidationWarning};
