//! FeedbackBuffer: owns the negative queue, the positive pending map, the
//! positive queue, and the output buffer.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use feedback_core::events::{
    BatchEmittedEvent, ConfirmedEvent, ExpiredDroppedEvent, FeedbackKind, PendingPurgedEvent,
    ReleasedEvent, StaleConfirmationEvent,
};
use feedback_core::{
    BufferConfig, FeedbackEventHandler, FeedbackResult, IClock, MonotonicClock, NoOpEventHandler,
};
use tracing::{debug, info, warn};

use crate::batch::BatchIter;
use crate::record::FeedbackRecord;
use crate::stats::{BufferStats, Counters};

/// Result of a confirmation attempt. Neither variant is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The pending record moved to the positive queue.
    Confirmed,
    /// No pending record for that ID: never observed, already confirmed,
    /// or purged. Nothing changed.
    UnknownOrProcessed,
}

impl ConfirmOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmOutcome::Confirmed)
    }
}

/// Delays feedback until it has baked, drops it once expired, and hands
/// released payloads out in batches.
///
/// Ordering precondition: timestamps passed to `enqueue_negative_at` must be
/// non-decreasing across calls, and confirmations are expected in roughly
/// arrival order. Only queue heads are inspected, so an out-of-order record
/// waits behind its predecessor. `enqueue` stamps with the monotonic clock
/// and satisfies this by construction.
///
/// Not internally synchronized; wrap in `SharedFeedbackBuffer` to share
/// across threads.
pub struct FeedbackBuffer<K, P> {
    config: BufferConfig,
    bake_gap: Duration,
    expiry_gap: Duration,
    negative: VecDeque<FeedbackRecord<P>>,
    positive: VecDeque<FeedbackRecord<P>>,
    pending: HashMap<K, FeedbackRecord<P>>,
    output: Vec<P>,
    clock: Arc<dyn IClock>,
    events: Arc<dyn FeedbackEventHandler>,
    counters: Counters,
}

impl<K, P> FeedbackBuffer<K, P>
where
    K: Eq + Hash,
{
    /// Build a buffer on the monotonic system clock.
    pub fn new(config: BufferConfig) -> FeedbackResult<Self> {
        Self::with_clock(config, Arc::new(MonotonicClock))
    }

    /// Build a buffer reading "now" from `clock`.
    ///
    /// Rejects configs where `expiry_gap < bake_gap`, since nothing could
    /// ever be released.
    pub fn with_clock(config: BufferConfig, clock: Arc<dyn IClock>) -> FeedbackResult<Self> {
        config.validate()?;
        Ok(Self {
            bake_gap: config.bake_gap(),
            expiry_gap: config.expiry_gap(),
            config,
            negative: VecDeque::new(),
            positive: VecDeque::new(),
            pending: HashMap::new(),
            output: Vec::new(),
            clock,
            events: Arc::new(NoOpEventHandler),
            counters: Counters::default(),
        })
    }

    /// Attach an event handler, replacing the current one.
    pub fn set_event_handler(&mut self, handler: Arc<dyn FeedbackEventHandler>) {
        self.events = handler;
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Current reference time from the injected clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    // ---- Enqueue ----

    /// Record one observation: the negative payload is queued immediately and
    /// the positive payload waits under `id` for confirmation. Both share a
    /// single timestamp.
    pub fn enqueue(&mut self, id: K, negative_payload: P, positive_payload: P) {
        let now = self.clock.now();
        self.enqueue_negative_at(now, negative_payload);
        self.enqueue_pending_positive_at(now, id, positive_payload);
    }

    /// Append negative feedback observed at `arrived_at`.
    pub fn enqueue_negative_at(&mut self, arrived_at: Instant, payload: P) {
        self.negative
            .push_back(FeedbackRecord::new(arrived_at, payload));
        debug!(queued = self.negative.len(), "negative feedback queued");
    }

    /// Hold positive feedback observed at `arrived_at` until `id` is
    /// confirmed. An existing pending record for `id` is replaced.
    pub fn enqueue_pending_positive_at(&mut self, arrived_at: Instant, id: K, payload: P) {
        let replaced = self
            .pending
            .insert(id, FeedbackRecord::new(arrived_at, payload))
            .is_some();
        debug!(
            pending = self.pending.len(),
            replaced, "positive feedback awaiting confirmation"
        );
    }

    // ---- Confirmation ----

    /// Move the pending record for `id` to the positive queue, keeping its
    /// original arrival time.
    ///
    /// Unknown or already-processed IDs are logged and reported as
    /// `UnknownOrProcessed`; nothing changes.
    pub fn confirm_positive<Q>(&mut self, id: &Q) -> ConfirmOutcome
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        match self.pending.remove(id) {
            Some(record) => {
                let pending_for = record.age(self.clock.now());
                self.positive.push_back(record);
                self.counters.confirmed += 1;
                debug!(id = ?id, ?pending_for, "positive feedback confirmed");
                self.events.on_confirmed(&ConfirmedEvent { pending_for });
                ConfirmOutcome::Confirmed
            }
            None => {
                self.counters.stale_confirmations += 1;
                warn!(id = ?id, "feedback id is invalid or was already processed");
                self.events.on_stale_confirmation(&StaleConfirmationEvent {
                    id: format!("{id:?}"),
                });
                ConfirmOutcome::UnknownOrProcessed
            }
        }
    }

    /// Whether `id` still has a record awaiting confirmation.
    pub fn is_pending<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.pending.contains_key(id)
    }

    /// Drop every pending record that has expired; they can never be
    /// confirmed afterwards. Returns how many were removed.
    ///
    /// Scans the whole pending map: O(n) in its size and potentially slow.
    /// Run it on a maintenance cadence, not per operation.
    pub fn purge_expired_pending(&mut self) -> usize {
        let now = self.clock.now();
        self.purge_expired_pending_at(now)
    }

    /// `purge_expired_pending` against an explicit reference time.
    pub fn purge_expired_pending_at(&mut self, now: Instant) -> usize {
        let before = self.pending.len();
        let expiry_gap = self.expiry_gap;
        self.pending
            .retain(|_, record| !record.is_expired(now, expiry_gap));
        let removed = before - self.pending.len();

        self.counters.pending_purged += removed as u64;
        info!(removed, remaining = self.pending.len(), "expired pending feedback purged");
        self.events.on_pending_purged(&PendingPurgedEvent {
            removed,
            remaining: self.pending.len(),
        });
        removed
    }

    // ---- Release ----

    /// True iff the head of either queue has baked. Read-only.
    pub fn has_baked_feedback(&self) -> bool {
        self.has_baked_feedback_at(self.clock.now())
    }

    /// `has_baked_feedback` against an explicit reference time.
    pub fn has_baked_feedback_at(&self, now: Instant) -> bool {
        let baked = |queue: &VecDeque<FeedbackRecord<P>>| {
            queue
                .front()
                .is_some_and(|head| head.is_baked(now, self.bake_gap))
        };
        baked(&self.negative) || baked(&self.positive)
    }

    /// Lazily release baked feedback and yield full batches.
    ///
    /// The reference time is captured once, here, and reused for the whole
    /// pass. See `BatchIter` for the batching rules.
    pub fn produce_next_batch(&mut self) -> BatchIter<'_, K, P> {
        let now = self.clock.now();
        BatchIter::new(self, now)
    }

    /// `produce_next_batch` against an explicit reference time.
    pub fn produce_next_batch_at(&mut self, now: Instant) -> BatchIter<'_, K, P> {
        BatchIter::new(self, now)
    }

    /// Hand out whatever is left in the output buffer as a partial batch.
    /// Does not release anything new.
    pub fn flush(&mut self) -> Option<Vec<P>> {
        if self.output.is_empty() {
            return None;
        }
        let batch = std::mem::take(&mut self.output);
        self.record_batch(batch.len(), true);
        Some(batch)
    }

    /// Pop the head of one queue if it has baked, keeping its payload only
    /// when unexpired. Returns whether a pop happened, regardless of the
    /// record's fate: an expired head must still be drained so fresher
    /// records behind it become reachable.
    pub(crate) fn release_one(&mut self, kind: FeedbackKind, now: Instant) -> bool {
        let bake_gap = self.bake_gap;
        let queue = match kind {
            FeedbackKind::Negative => &mut self.negative,
            FeedbackKind::Positive => &mut self.positive,
        };
        let head_baked = queue
            .front()
            .is_some_and(|head| head.is_baked(now, bake_gap));
        if !head_baked {
            return false;
        }
        let Some(record) = queue.pop_front() else {
            return false;
        };

        let age = record.age(now);
        if record.is_expired(now, self.expiry_gap) {
            self.counters.expired_dropped += 1;
            debug!(%kind, ?age, "expired feedback dropped");
            self.events
                .on_expired_dropped(&ExpiredDroppedEvent { kind, age });
        } else {
            self.output.push(record.into_payload());
            self.counters.released += 1;
            self.events.on_released(&ReleasedEvent { kind, age });
        }
        true
    }

    /// Take the output buffer if it has reached the batch size.
    pub(crate) fn take_full_batch(&mut self) -> Option<Vec<P>> {
        if self.output.len() < self.config.batch_size {
            return None;
        }
        let batch = std::mem::take(&mut self.output);
        self.record_batch(batch.len(), false);
        Some(batch)
    }

    fn record_batch(&mut self, size: usize, flushed: bool) {
        self.counters.batches_emitted += 1;
        debug!(size, flushed, "feedback batch emitted");
        self.events
            .on_batch_emitted(&BatchEmittedEvent { size, flushed });
    }

    // ---- Probes ----

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Released payloads waiting for a full batch or a flush.
    pub fn buffered_len(&self) -> usize {
        self.output.len()
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats::from_parts(
            self.negative.len(),
            self.positive.len(),
            self.pending.len(),
            self.output.len(),
            self.counters,
        )
    }
}
