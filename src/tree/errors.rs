//! Tree dump parsing errors
//!
//! Parsing is total for unrecognized or malformed lines. Only conditions
//! that leave no sensible forest to return are errors.

use thiserror::Error;

/// Result type for tree parsing
pub type TreeResult<T> = Result<T, TreeParseError>;

/// Fail-fast tree parsing error
#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("Node on line {line} would be a third child of a decision in tree {tree}")]
    ChildOverflow { tree: String, line: usize },

    #[error("Failed to read tree dump '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tree dump '{path}' is not valid UTF-8")]
    Encoding { path: String },
}

impl TreeParseError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            TreeParseError::ChildOverflow { .. } => "TREE_CHILD_OVERFLOW",
            TreeParseError::Io { .. } => "TREE_IO",
            TreeParseError::Encoding { .. } => "TREE_ENCODING",
        }
    }

    /// Source line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            TreeParseError::ChildOverflow { line, .. } => Some(*line),
            _ => None,
        }
    }
}
