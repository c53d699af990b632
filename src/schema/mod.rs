//! Schema subsystem
//!
//! A schema declares the type of each CSV column, the identifier column and
//! the columns that must be present.
//!
//! # Design Principles
//!
//! - Schema documents are validated before they are decoded
//! - Validation accumulates every defect (no short-circuit)
//! - Unmapped CSV columns are tolerated but reported
//! - The identifier column is never a feature

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use loader::{load_schema_file, parse_schema};
pub use types::{DataSchema, DataType, SchemaMetadata};
pub use validator::SchemaValidator;
