//! Diagnosis errors: construction and call-time failures of the engine.

use super::error_code::{self, SagedErrorCode};
use super::SchemaError;

/// Errors surfaced by the diagnosis engine.
///
/// Per-value numeric problems (empty groups, all-NaN columns, zero
/// denominators) are never errors; they degrade to NaN in the output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosisError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid group type '{group_type}': use 'domain' or 'concept'")]
    InvalidGroupType { group_type: String },

    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("Invalid specification: {message}")]
    InvalidSpecification { message: String },

    #[error("Unknown statistic '{name}'")]
    UnknownStatistic { name: String },

    #[error("Diagnosis cancelled")]
    Cancelled,
}

impl DiagnosisError {
    /// Shorthand for an `InvalidConfiguration` error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SagedErrorCode for DiagnosisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(e) => e.error_code(),
            Self::InvalidGroupType { .. } => error_code::INVALID_GROUP_TYPE,
            Self::InvalidConfiguration { .. } => error_code::INVALID_CONFIGURATION,
            Self::InvalidSpecification { .. } => error_code::INVALID_SPECIFICATION,
            Self::UnknownStatistic { .. } => error_code::UNKNOWN_STATISTIC,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
