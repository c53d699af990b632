//! Schema type definitions
//!
//! Supported column types:
//! - float64: 64-bit floating point
//! - int64: integer (truncated from a float parse)
//! - object: categorical text
//! - bool: Boolean
//! - datetime: date/time kept as text

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit floating point
    #[serde(rename = "float64")]
    Float64,
    /// Integer, stored as a truncated float
    #[serde(rename = "int64")]
    Int64,
    /// Categorical text
    #[serde(rename = "object")]
    Object,
    /// Boolean
    #[serde(rename = "bool")]
    Bool,
    /// Date/time, kept as text
    #[serde(rename = "datetime")]
    Datetime,
}

impl DataType {
    /// All accepted type names, in declaration order
    pub const NAMES: [&'static str; 5] = ["float64", "int64", "object", "bool", "datetime"];

    /// Returns the type name as written in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Float64 => "float64",
            DataType::Int64 => "int64",
            DataType::Object => "object",
            DataType::Bool => "bool",
            DataType::Datetime => "datetime",
        }
    }

    /// Parses a type name as written in schema documents
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float64" => Some(DataType::Float64),
            "int64" => Some(DataType::Int64),
            "object" => Some(DataType::Object),
            "bool" => Some(DataType::Bool),
            "datetime" => Some(DataType::Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Descriptive metadata carried alongside a schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Schema describing a claims CSV file.
///
/// The identifier column is never extracted as a feature, even when it also
/// appears in `column_types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSchema {
    /// Declared type per column
    pub column_types: BTreeMap<String, DataType>,
    /// Columns that must be present in the CSV
    pub required_columns: Vec<String>,
    /// Column holding the claim identifier
    pub claim_id_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_reason_column: Option<String>,
    /// Columns dropped from feature extraction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SchemaMetadata>,
}

impl DataSchema {
    /// Create a new schema with no auxiliary columns
    pub fn new(
        claim_id_column: impl Into<String>,
        required_columns: Vec<String>,
        column_types: BTreeMap<String, DataType>,
    ) -> Self {
        Self {
            column_types,
            required_columns,
            claim_id_column: claim_id_column.into(),
            score_column: None,
            classification_column: None,
            exclusion_reason_column: None,
            ignored_columns: Vec::new(),
            metadata: None,
        }
    }

    /// Returns the declared type of a column, if any
    pub fn column_type(&self, column: &str) -> Option<DataType> {
        self.column_types.get(column).copied()
    }

    /// Whether the column has an entry in the type mapping
    pub fn is_mapped(&self, column: &str) -> bool {
        self.column_types.contains_key(column)
    }

    pub fn is_id_column(&self, column: &str) -> bool {
        self.claim_id_column == column
    }

    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignored_columns.iter().any(|c| c == column)
    }

    /// Whether the column is configured as score, classification or
    /// exclusion reason
    pub fn is_auxiliary(&self, column: &str) -> bool {
        self.auxiliary_columns().iter().any(|(_, c)| *c == column)
    }

    /// Whether a column contributes to a record's feature map
    pub fn is_feature_column(&self, column: &str) -> bool {
        !self.is_id_column(column) && !self.is_ignored(column) && !self.is_auxiliary(column)
    }

    /// Configured auxiliary columns as (role, column) pairs
    pub fn auxiliary_columns(&self) -> Vec<(&'static str, &str)> {
        let mut columns = Vec::new();
        if let Some(c) = &self.score_column {
            columns.push(("scoreColumn", c.as_str()));
        }
        if let Some(c) = &self.classification_column {
            columns.push(("classificationColumn", c.as_str()));
        }
        if let Some(c) = &self.exclusion_reason_column {
            columns.push(("exclusionReasonColumn", c.as_str()));
        }
        columns
    }
}
