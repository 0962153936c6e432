//! Event payloads. Payload-agnostic: they carry ages and counts, never the
//! feedback values themselves.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which stream a record travelled through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Negative,
    Positive,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Negative => "negative",
            FeedbackKind::Positive => "positive",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A baked, unexpired record was moved to the output buffer.
#[derive(Debug, Clone)]
pub struct ReleasedEvent {
    pub kind: FeedbackKind,
    pub age: Duration,
}

/// A baked record was popped past its expiry and discarded.
#[derive(Debug, Clone)]
pub struct ExpiredDroppedEvent {
    pub kind: FeedbackKind,
    pub age: Duration,
}

/// A pending positive record was confirmed and queued.
#[derive(Debug, Clone)]
pub struct ConfirmedEvent {
    /// Time between the original observation and the confirmation.
    pub pending_for: Duration,
}

/// A confirmation named an ID with no pending record.
#[derive(Debug, Clone)]
pub struct StaleConfirmationEvent {
    pub id: String,
}

/// A purge pass removed expired pending records.
#[derive(Debug, Clone)]
pub struct PendingPurgedEvent {
    pub removed: usize,
    pub remaining: usize,
}

/// A batch was handed to the consumer.
#[derive(Debug, Clone)]
pub struct BatchEmittedEvent {
    pub size: usize,
    /// True for a partial batch produced by an explicit flush.
    pub flushed: bool,
}
