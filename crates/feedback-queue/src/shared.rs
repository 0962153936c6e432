//! SharedFeedbackBuffer: one mutex guarding all four containers.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use feedback_core::{BufferConfig, BufferError, FeedbackResult, IClock};

use crate::buffer::{ConfirmOutcome, FeedbackBuffer};
use crate::stats::BufferStats;

/// Thread-safe handle to a `FeedbackBuffer`. Cloning shares the buffer.
///
/// Every call holds the lock for its whole duration, so each operation sees
/// one consistent reference time and one consistent set of containers.
/// Batch production is therefore eager: `drain_batches` collects the full
/// pass under the lock instead of handing out a borrowing iterator.
pub struct SharedFeedbackBuffer<K, P> {
    inner: Arc<Mutex<FeedbackBuffer<K, P>>>,
}

impl<K, P> Clone for SharedFeedbackBuffer<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, P> SharedFeedbackBuffer<K, P>
where
    K: Eq + Hash,
{
    pub fn new(config: BufferConfig) -> FeedbackResult<Self> {
        Ok(Self::from_buffer(FeedbackBuffer::new(config)?))
    }

    pub fn with_clock(config: BufferConfig, clock: Arc<dyn IClock>) -> FeedbackResult<Self> {
        Ok(Self::from_buffer(FeedbackBuffer::with_clock(config, clock)?))
    }

    pub fn from_buffer(buffer: FeedbackBuffer<K, P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Run `f` with exclusive access to the buffer.
    pub fn with_buffer<F, T>(&self, f: F) -> FeedbackResult<T>
    where
        F: FnOnce(&mut FeedbackBuffer<K, P>) -> T,
    {
        let mut guard = self.inner.lock().map_err(|e| BufferError::LockPoisoned {
            reason: e.to_string(),
        })?;
        Ok(f(&mut guard))
    }

    pub fn enqueue(&self, id: K, negative_payload: P, positive_payload: P) -> FeedbackResult<()> {
        self.with_buffer(|b| b.enqueue(id, negative_payload, positive_payload))
    }

    pub fn confirm_positive<Q>(&self, id: &Q) -> FeedbackResult<ConfirmOutcome>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.with_buffer(|b| b.confirm_positive(id))
    }

    pub fn purge_expired_pending(&self) -> FeedbackResult<usize> {
        self.with_buffer(|b| b.purge_expired_pending())
    }

    pub fn has_baked_feedback(&self) -> FeedbackResult<bool> {
        self.with_buffer(|b| b.has_baked_feedback())
    }

    /// Run one full release pass and return every batch it produced.
    pub fn drain_batches(&self) -> FeedbackResult<Vec<Vec<P>>> {
        self.with_buffer(|b| b.produce_next_batch().collect())
    }

    pub fn flush(&self) -> FeedbackResult<Option<Vec<P>>> {
        self.with_buffer(|b| b.flush())
    }

    pub fn stats(&self) -> FeedbackResult<BufferStats> {
        self.with_buffer(|b| b.stats())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use feedback_core::ManualClock;

    use super::*;

    #[test]
    fn concurrent_producers_and_confirmers() {
        let clock = Arc::new(ManualClock::new());
        let shared: SharedFeedbackBuffer<u64, u64> =
            SharedFeedbackBuffer::with_clock(BufferConfig::new(1.0, 100.0, 10), clock.clone())
                .unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        let id = t * 1_000 + i;
                        shared.enqueue(id, id, id).unwrap();
                        assert!(shared.confirm_positive(&id).unwrap().is_confirmed());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        clock.set_secs(2);
        let batches = shared.drain_batches().unwrap();
        let released: usize = batches.iter().map(Vec::len).sum();
        let leftover = shared.flush().unwrap().map_or(0, |b| b.len());
        assert_eq!(released + leftover, 200);

        let stats = shared.stats().unwrap();
        assert_eq!(stats.confirmed, 100);
        assert_eq!(stats.released, 200);
        assert_eq!(stats.in_flight(), 0);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared: SharedFeedbackBuffer<u32, u32> =
            SharedFeedbackBuffer::new(BufferConfig::default()).unwrap();
        let clone = shared.clone();
        let _ = thread::spawn(move || {
            let _ = clone.with_buffer(|_| panic!("poison"));
        })
        .join();

        assert!(matches!(
            shared.has_baked_feedback(),
            Err(BufferError::LockPoisoned { .. })
        ));
    }
}
