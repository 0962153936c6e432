//! FeedbackErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// that survives message rewording.
pub trait FeedbackErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const LOCK_POISONED: &str = "LOCK_POISONED";
