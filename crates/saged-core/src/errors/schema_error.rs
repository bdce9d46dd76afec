//! Schema errors raised while inferring or validating the scored table layout.

use super::error_code::{self, SagedErrorCode};

/// Errors that make a scored table unusable for diagnosis.
///
/// All variants are fatal and surface at construction time, before any
/// statistic is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Required specification column '{column}' not found in scored table")]
    MissingSpecificationColumn { column: String },

    #[error("Generation feature column '{column}' not found in scored table")]
    MissingValueColumn { column: String },

    #[error("Ambiguous {role} identifier '{identifier}': must not contain '_'")]
    AmbiguousIdentifier { identifier: String, role: String },

    #[error("No generation/feature columns to analyze")]
    NoValueColumns,

    #[error("Duplicate column '{column}' in scored table")]
    DuplicateColumn { column: String },

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed scored records: {message}")]
    MalformedRecords { message: String },
}

impl SagedErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        error_code::SCHEMA_ERROR
    }
}
