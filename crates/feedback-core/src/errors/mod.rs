//! Error handling for the feedback buffer.
//! One error enum per subsystem, `thiserror` only.
//!
//! Stale or unknown confirmations are deliberately absent: they are reported
//! as an outcome, not raised as an error.

pub mod buffer_error;
pub mod config_error;
pub mod error_code;

pub use buffer_error::{BufferError, FeedbackResult};
pub use config_error::ConfigError;
pub use error_code::FeedbackErrorCode;
