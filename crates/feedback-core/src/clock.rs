//! Clock implementations: the real monotonic clock and a manually driven one
//! for tests and simulations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::traits::IClock;

/// Wall-independent clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl IClock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock whose "now" only moves when told to.
///
/// Time is tracked as an offset from a fixed origin captured at construction,
/// so `at(Duration::from_secs(21))` means "21 seconds after the origin".
/// `set` may move time backwards; the buffer tolerates that but the ordering
/// precondition of timestamped enqueues is then the caller's problem.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Create a clock positioned at its origin (offset zero).
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// The instant `offset` after the origin.
    pub fn at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Shorthand for `at(Duration::from_secs(secs))`.
    pub fn at_secs(&self, secs: u64) -> Instant {
        self.at(Duration::from_secs(secs))
    }

    /// Current offset from the origin.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }

    /// Jump to `offset` after the origin.
    pub fn set(&self, offset: Duration) {
        self.offset_nanos.store(to_nanos(offset), Ordering::SeqCst);
    }

    /// Shorthand for `set(Duration::from_secs(secs))`.
    pub fn set_secs(&self, secs: u64) {
        self.set(Duration::from_secs(secs));
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = to_nanos(delta);
        let _ = self
            .offset_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(delta))
            });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl IClock for ManualClock {
    fn now(&self) -> Instant {
        self.at(self.elapsed())
    }
}

fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_origin() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), clock.at_secs(0));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn manual_clock_advance_and_set() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(5));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), clock.at(Duration::from_millis(5_500)));

        clock.set_secs(2);
        assert_eq!(clock.now(), clock.at_secs(2));
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
