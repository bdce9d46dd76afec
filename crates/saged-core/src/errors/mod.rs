//! Error handling for SAGED.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod diagnosis_error;
pub mod error_code;
pub mod schema_error;

pub use config_error::ConfigError;
pub use diagnosis_error::DiagnosisError;
pub use error_code::SagedErrorCode;
pub use schema_error::SchemaError;
