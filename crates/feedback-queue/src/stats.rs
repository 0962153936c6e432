//! Point-in-time view of buffer occupancy plus lifetime counters.

use serde::{Deserialize, Serialize};

/// Lifetime counters. Only ever incremented.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub released: u64,
    pub expired_dropped: u64,
    pub confirmed: u64,
    pub stale_confirmations: u64,
    pub pending_purged: u64,
    pub batches_emitted: u64,
}

/// Snapshot returned by `FeedbackBuffer::stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferStats {
    /// Records waiting in the negative queue.
    pub negative_queued: usize,
    /// Confirmed records waiting in the positive queue.
    pub positive_queued: usize,
    /// Positive records awaiting confirmation.
    pub pending: usize,
    /// Released payloads not yet handed out as a batch.
    pub buffered: usize,
    /// Payloads moved to the output buffer since construction.
    pub released: u64,
    /// Baked records discarded because they had expired.
    pub expired_dropped: u64,
    /// Successful confirmations.
    pub confirmed: u64,
    /// Confirmations for unknown or already-processed IDs.
    pub stale_confirmations: u64,
    /// Pending records removed by purges.
    pub pending_purged: u64,
    /// Batches handed out, including flushed partial batches.
    pub batches_emitted: u64,
}

impl BufferStats {
    pub(crate) fn from_parts(
        negative_queued: usize,
        positive_queued: usize,
        pending: usize,
        buffered: usize,
        counters: Counters,
    ) -> Self {
        Self {
            negative_queued,
            positive_queued,
            pending,
            buffered,
            released: counters.released,
            expired_dropped: counters.expired_dropped,
            confirmed: counters.confirmed,
            stale_confirmations: counters.stale_confirmations,
            pending_purged: counters.pending_purged,
            batches_emitted: counters.batches_emitted,
        }
    }

    /// Records still held anywhere in the buffer.
    pub fn in_flight(&self) -> usize {
        self.negative_queued + self.positive_queued + self.pending + self.buffered
    }

    /// Serialize to a JSON string for export.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
