//! FeedbackEventHandler trait with no-op defaults.

use super::types::*;

/// Trait for observing buffer lifecycle events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. Handlers run synchronously
/// inside the buffer operation that raised the event.
pub trait FeedbackEventHandler: Send + Sync {
    // ---- Release path ----
    fn on_released(&self, _event: &ReleasedEvent) {}
    fn on_expired_dropped(&self, _event: &ExpiredDroppedEvent) {}
    fn on_batch_emitted(&self, _event: &BatchEmittedEvent) {}

    // ---- Pending positives ----
    fn on_confirmed(&self, _event: &ConfirmedEvent) {}
    fn on_stale_confirmation(&self, _event: &StaleConfirmationEvent) {}
    fn on_pending_purged(&self, _event: &PendingPurgedEvent) {}
}

/// Handler that ignores everything. The buffer's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventHandler;

impl FeedbackEventHandler for NoOpEventHandler {}
