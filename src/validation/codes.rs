//! Machine-readable issue codes
//!
//! Every error and warning produced by a validator carries one of these
//! codes. Codes are stable strings so downstream consumers can match on
//! them without parsing messages.
//!
//! Categories:
//! - MALFORMED_INPUT: pre-flight size/extension/syntax problems
//! - STRUCTURAL_DEFECT: missing root, incomplete decision, missing leaf value
//! - SCHEMA_MISMATCH: unknown feature, missing column, wrong declared type
//! - COERCION_FAILURE: a cell could not be converted to its declared type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// Input that cannot be read or has the wrong shape
    MalformedInput,
    /// A tree is incomplete or its arena is inconsistent
    StructuralDefect,
    /// Input disagrees with the declared schema
    SchemaMismatch,
    /// A cell value does not fit its declared type
    CoercionFailure,
}

impl IssueCategory {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::MalformedInput => "MALFORMED_INPUT",
            IssueCategory::StructuralDefect => "STRUCTURAL_DEFECT",
            IssueCategory::SchemaMismatch => "SCHEMA_MISMATCH",
            IssueCategory::CoercionFailure => "COERCION_FAILURE",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue codes attached to validation errors and warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Schema document
    SchemaInvalidJson,
    SchemaNotObject,
    SchemaMissingColumnTypes,
    SchemaMissingClaimId,
    SchemaMissingRequiredColumns,
    SchemaInvalidType,
    SchemaInvalidField,

    // Schema against CSV headers
    ColumnIdMissing,
    ColumnRequiredMissing,
    ColumnUnmapped,
    ColumnAuxiliaryMissing,

    // CSV pre-flight
    CsvNotCsv,
    CsvTooLarge,
    CsvSyntax,
    CsvUnreadable,

    // CSV cell coercion
    CellNotNumeric,
    CellNotBoolean,
    CellNotDatetime,
    RecordDuplicateId,

    // Tree dump parsing
    TreeMalformedLine,
    TreeDefaultedValue,
    TreeSkippedLine,
    TreeOrphanNode,
    TreeChildOverflow,

    // Tree structure
    TreeMissingRoot,
    TreeMissingFeature,
    TreeMissingOperator,
    TreeMissingThreshold,
    TreeMissingLeafValue,
    TreeDanglingChild,
    TreeSharedNode,

    // Tree against schema
    TreeUnknownFeature,
}

impl IssueCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IssueCode::SchemaInvalidJson => "SCHEMA_INVALID_JSON",
            IssueCode::SchemaNotObject => "SCHEMA_NOT_OBJECT",
            IssueCode::SchemaMissingColumnTypes => "SCHEMA_MISSING_COLUMN_TYPES",
            IssueCode::SchemaMissingClaimId => "SCHEMA_MISSING_CLAIM_ID",
            IssueCode::SchemaMissingRequiredColumns => "SCHEMA_MISSING_REQUIRED_COLUMNS",
            IssueCode::SchemaInvalidType => "SCHEMA_INVALID_TYPE",
            IssueCode::SchemaInvalidField => "SCHEMA_INVALID_FIELD",
            IssueCode::ColumnIdMissing => "COLUMN_ID_MISSING",
            IssueCode::ColumnRequiredMissing => "COLUMN_REQUIRED_MISSING",
            IssueCode::ColumnUnmapped => "COLUMN_UNMAPPED",
            IssueCode::ColumnAuxiliaryMissing => "COLUMN_AUXILIARY_MISSING",
            IssueCode::CsvNotCsv => "CSV_NOT_CSV",
            IssueCode::CsvTooLarge => "CSV_TOO_LARGE",
            IssueCode::CsvSyntax => "CSV_SYNTAX",
            IssueCode::CsvUnreadable => "CSV_UNREADABLE",
            IssueCode::CellNotNumeric => "CELL_NOT_NUMERIC",
            IssueCode::CellNotBoolean => "CELL_NOT_BOOLEAN",
            IssueCode::CellNotDatetime => "CELL_NOT_DATETIME",
            IssueCode::RecordDuplicateId => "RECORD_DUPLICATE_ID",
            IssueCode::TreeMalformedLine => "TREE_MALFORMED_LINE",
            IssueCode::TreeDefaultedValue => "TREE_DEFAULTED_VALUE",
            IssueCode::TreeSkippedLine => "TREE_SKIPPED_LINE",
            IssueCode::TreeOrphanNode => "TREE_ORPHAN_NODE",
            IssueCode::TreeChildOverflow => "TREE_CHILD_OVERFLOW",
            IssueCode::TreeMissingRoot => "TREE_MISSING_ROOT",
            IssueCode::TreeMissingFeature => "TREE_MISSING_FEATURE",
            IssueCode::TreeMissingOperator => "TREE_MISSING_OPERATOR",
            IssueCode::TreeMissingThreshold => "TREE_MISSING_THRESHOLD",
            IssueCode::TreeMissingLeafValue => "TREE_MISSING_LEAF_VALUE",
            IssueCode::TreeDanglingChild => "TREE_DANGLING_CHILD",
            IssueCode::TreeSharedNode => "TREE_SHARED_NODE",
            IssueCode::TreeUnknownFeature => "TREE_UNKNOWN_FEATURE",
        }
    }

    /// Returns the category this code belongs to
    pub fn category(&self) -> IssueCategory {
        match self {
            IssueCode::SchemaInvalidJson
            | IssueCode::SchemaNotObject
            | IssueCode::SchemaMissingColumnTypes
            | IssueCode::SchemaMissingClaimId
            | IssueCode::SchemaMissingRequiredColumns
            | IssueCode::SchemaInvalidField
            | IssueCode::CsvNotCsv
            | IssueCode::CsvTooLarge
            | IssueCode::CsvSyntax
            | IssueCode::CsvUnreadable
            | IssueCode::TreeMalformedLine
            | IssueCode::TreeDefaultedValue
            | IssueCode::TreeSkippedLine => IssueCategory::MalformedInput,

            IssueCode::TreeOrphanNode
            | IssueCode::TreeChildOverflow
            | IssueCode::TreeMissingRoot
            | IssueCode::TreeMissingFeature
            | IssueCode::TreeMissingOperator
            | IssueCode::TreeMissingThreshold
            | IssueCode::TreeMissingLeafValue
            | IssueCode::TreeDanglingChild
            | IssueCode::TreeSharedNode => IssueCategory::StructuralDefect,

            IssueCode::SchemaInvalidType
            | IssueCode::ColumnIdMissing
            | IssueCode::ColumnRequiredMissing
            | IssueCode::ColumnUnmapped
            | IssueCode::ColumnAuxiliaryMissing
            | IssueCode::TreeUnknownFeature => IssueCategory::SchemaMismatch,

            IssueCode::CellNotNumeric
            | IssueCode::CellNotBoolean
            | IssueCode::CellNotDatetime
            | IssueCode::RecordDuplicateId => IssueCategory::CoercionFailure,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
