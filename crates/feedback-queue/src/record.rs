use std::time::{Duration, Instant};

/// A feedback payload stamped with its arrival time. Immutable once built.
///
/// Bake and expiry windows are always measured from `arrived_at`, including
/// for positive feedback confirmed later.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord<P> {
    arrived_at: Instant,
    payload: P,
}

impl<P> FeedbackRecord<P> {
    pub fn new(arrived_at: Instant, payload: P) -> Self {
        Self {
            arrived_at,
            payload,
        }
    }

    pub fn arrived_at(&self) -> Instant {
        self.arrived_at
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Age at `now`. Zero if `now` precedes arrival.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.arrived_at)
    }

    /// Baked iff `arrived_at + bake_gap <= now`.
    pub fn is_baked(&self, now: Instant, bake_gap: Duration) -> bool {
        now >= self.arrived_at && self.age(now) >= bake_gap
    }

    /// Expired iff `arrived_at + expiry_gap <= now`.
    pub fn is_expired(&self, now: Instant, expiry_gap: Duration) -> bool {
        now >= self.arrived_at && self.age(now) >= expiry_gap
    }
}
