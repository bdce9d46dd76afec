//! SagedErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait SagedErrorCode {
    /// Returns the error code string (e.g., "SCHEMA_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_GROUP_TYPE: &str = "INVALID_GROUP_TYPE";
pub const INVALID_CONFIGURATION: &str = "INVALID_CONFIGURATION";
pub const INVALID_SPECIFICATION: &str = "INVALID_SPECIFICATION";
pub const UNKNOWN_STATISTIC: &str = "UNKNOWN_STATISTIC";
pub const CANCELLED: &str = "CANCELLED";
