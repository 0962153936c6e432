//! Lazy batch extraction over a `FeedbackBuffer`.

use std::hash::Hash;
use std::time::Instant;

use feedback_core::FeedbackKind;
use tracing::info;

use crate::buffer::FeedbackBuffer;

/// Iterator returned by `FeedbackBuffer::produce_next_batch`.
///
/// Runs rounds of at most one pop per queue (positive, then negative) until
/// a round pops nothing from either. After every round, a full output
/// buffer is yielded and cleared. Because one round can add two payloads,
/// batches hold `batch_size` or `batch_size + 1` items.
///
/// Both streams merge into the same batches with no marker of origin.
///
/// Payloads released but short of a full batch stay buffered when the
/// iterator is exhausted; use `FeedbackBuffer::flush` to retrieve them.
/// Dropping the iterator early leaves the buffer consistent.
pub struct BatchIter<'a, K, P> {
    buffer: &'a mut FeedbackBuffer<K, P>,
    now: Instant,
    read_positive: bool,
    read_negative: bool,
    batches: usize,
    reported: bool,
}

impl<'a, K, P> BatchIter<'a, K, P>
where
    K: Eq + Hash,
{
    pub(crate) fn new(buffer: &'a mut FeedbackBuffer<K, P>, now: Instant) -> Self {
        Self {
            buffer,
            now,
            read_positive: true,
            read_negative: true,
            batches: 0,
            reported: false,
        }
    }

    /// The reference time every decision in this pass is made against.
    pub fn reference_time(&self) -> Instant {
        self.now
    }

    fn exhausted(&self) -> bool {
        !self.read_positive && !self.read_negative
    }
}

impl<K, P> Iterator for BatchIter<'_, K, P>
where
    K: Eq + Hash,
{
    type Item = Vec<P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.exhausted() {
                if !self.reported {
                    self.reported = true;
                    info!(
                        batches = self.batches,
                        buffered = self.buffer.buffered_len(),
                        "feedback release pass complete"
                    );
                }
                return None;
            }

            if self.read_positive {
                self.read_positive = self.buffer.release_one(FeedbackKind::Positive, self.now);
            }
            if self.read_negative {
                self.read_negative = self.buffer.release_one(FeedbackKind::Negative, self.now);
            }

            if let Some(batch) = self.buffer.take_full_batch() {
                self.batches += 1;
                return Some(batch);
            }
        }
    }
}
