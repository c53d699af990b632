//! Parsed CSV records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::validation::ValidationWarning;

/// A coerced cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One CSV data row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Value of the identifier column
    pub id: String,
    /// Coerced feature cells, keyed by column name
    pub features: BTreeMap<String, FeatureValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_reason: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: BTreeMap::new(),
            score: None,
            classification: None,
            exclusion_reason: None,
        }
    }

    pub fn feature(&self, column: &str) -> Option<&FeatureValue> {
        self.features.get(column)
    }
}

/// Output of a full CSV parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDataset {
    /// Header row, in file order
    pub headers: Vec<String>,
    /// One record per data row, in file order
    pub records: Vec<Record>,
    /// Per-cell and per-record warnings, in file order
    pub warnings: Vec<ValidationWarning>,
}
