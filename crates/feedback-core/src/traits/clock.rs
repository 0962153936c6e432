use std::time::Instant;

/// Source of the reference time used for every bake and expiry decision.
///
/// Implementations must be monotonic for the buffer's ordering precondition
/// to hold on `enqueue`. Callers capture `now()` once per logical operation.
pub trait IClock: Send + Sync {
    /// Current reference time.
    fn now(&self) -> Instant;
}
