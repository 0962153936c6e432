//! Feedback buffer errors.

use super::config_error::ConfigError;
use super::error_code::{self, FeedbackErrorCode};

/// Errors raised by buffer construction and the shared (locked) buffer.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("invalid buffer configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("buffer lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

impl FeedbackErrorCode for BufferError {
    fn error_code(&self) -> &'static str {
        match self {
            BufferError::Config(_) => error_code::CONFIG_ERROR,
            BufferError::LockPoisoned { .. } => error_code::LOCK_POISONED,
        }
    }
}

pub type FeedbackResult<T> = Result<T, BufferError>;
