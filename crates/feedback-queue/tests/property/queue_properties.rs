use std::sync::Arc;

use feedback_core::{BufferConfig, ManualClock};
use feedback_queue::FeedbackBuffer;
use proptest::prelude::*;

/// Payload records its own arrival offset so emitted items can be checked
/// against the pass's reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamped {
    arrived_secs: u64,
    positive: bool,
}

fn make_buffer(bake: u64, expiry: u64, batch: usize) -> (FeedbackBuffer<u64, Stamped>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let config = BufferConfig::new(bake as f64, expiry as f64, batch);
    let buffer = FeedbackBuffer::with_clock(config, clock.clone()).unwrap();
    (buffer, clock)
}

/// Sorted arrival offsets, as the ordering precondition requires.
fn arb_arrivals() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..500, 0..60).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

fn arb_gaps() -> impl Strategy<Value = (u64, u64)> {
    (0u64..100).prop_flat_map(|bake| (Just(bake), bake..bake + 300))
}

proptest! {
    #[test]
    fn emitted_records_are_baked_and_unexpired(
        arrivals in arb_arrivals(),
        (bake, expiry) in arb_gaps(),
        batch in 1usize..8,
        release_points in prop::collection::vec(0u64..900, 1..6),
    ) {
        let (mut buf, clock) = make_buffer(bake, expiry, batch);
        for (i, &t) in arrivals.iter().enumerate() {
            let id = i as u64;
            buf.enqueue_negative_at(clock.at_secs(t), Stamped { arrived_secs: t, positive: false });
            buf.enqueue_pending_positive_at(clock.at_secs(t), id, Stamped { arrived_secs: t, positive: true });
            buf.confirm_positive(&id);
        }

        let mut points = release_points;
        points.sort_unstable();
        for now in points {
            let before = buf.buffered_len();
            let batches: Vec<_> = buf.produce_next_batch_at(clock.at_secs(now)).collect();
            // Skip what was already buffered from earlier passes.
            let mut skip = before;
            for item in batches.into_iter().flatten() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                prop_assert!(item.arrived_secs + bake <= now, "released unbaked: {:?} at {}", item, now);
                prop_assert!(item.arrived_secs + expiry > now, "released expired: {:?} at {}", item, now);
            }
        }
    }

    #[test]
    fn every_record_released_or_dropped_exactly_once(
        arrivals in arb_arrivals(),
        (bake, expiry) in arb_gaps(),
        batch in 1usize..8,
        now in 0u64..900,
    ) {
        let (mut buf, clock) = make_buffer(bake, expiry, batch);
        for &t in &arrivals {
            buf.enqueue_negative_at(clock.at_secs(t), Stamped { arrived_secs: t, positive: false });
        }

        let mut released: usize = buf.produce_next_batch_at(clock.at_secs(now)).map(|b| b.len()).sum();
        released += buf.flush().map_or(0, |b| b.len());

        let stats = buf.stats();
        prop_assert_eq!(released as u64, stats.released);
        prop_assert_eq!(
            released + stats.expired_dropped as usize + buf.negative_len(),
            arrivals.len()
        );
        let expected_released = arrivals
            .iter()
            .filter(|&&t| t + bake <= now && t + expiry > now)
            .count();
        prop_assert_eq!(released, expected_released);
    }

    #[test]
    fn batches_hold_batch_size_or_one_more(
        negatives in 0usize..80,
        positives in 0usize..80,
        batch in 1usize..10,
    ) {
        let (mut buf, clock) = make_buffer(1, 1_000, batch);
        for i in 0..negatives {
            buf.enqueue_negative_at(clock.at_secs(0), Stamped { arrived_secs: i as u64, positive: false });
        }
        for i in 0..positives {
            let id = i as u64;
            buf.enqueue_pending_positive_at(clock.at_secs(0), id, Stamped { arrived_secs: 0, positive: true });
            buf.confirm_positive(&id);
        }

        let batches: Vec<_> = buf.produce_next_batch_at(clock.at_secs(5)).collect();
        for b in &batches {
            prop_assert!(b.len() == batch || b.len() == batch + 1, "batch of {} for size {}", b.len(), batch);
        }
        prop_assert!(buf.buffered_len() < batch);

        let total: usize = batches.iter().map(Vec::len).sum::<usize>() + buf.buffered_len();
        prop_assert_eq!(total, negatives + positives);
    }

    #[test]
    fn repeated_confirmation_never_duplicates(
        ids in prop::collection::vec(0u64..20, 1..40),
    ) {
        let (mut buf, clock) = make_buffer(0, 10, 1);
        for id in 0..20u64 {
            buf.enqueue_pending_positive_at(clock.at_secs(0), id, Stamped { arrived_secs: 0, positive: true });
        }

        let mut confirmed = std::collections::HashSet::new();
        for id in &ids {
            let outcome = buf.confirm_positive(id);
            prop_assert_eq!(outcome.is_confirmed(), confirmed.insert(*id));
        }
        prop_assert_eq!(buf.positive_len(), confirmed.len());
        prop_assert_eq!(buf.pending_len(), 20 - confirmed.len());
    }

    #[test]
    fn purge_removes_exactly_expired_and_is_idempotent(
        arrivals in arb_arrivals(),
        expiry in 1u64..300,
        now in 0u64..900,
    ) {
        let (mut buf, clock) = make_buffer(0, expiry, 1);
        for (i, &t) in arrivals.iter().enumerate() {
            buf.enqueue_pending_positive_at(clock.at_secs(t), i as u64, Stamped { arrived_secs: t, positive: true });
        }

        let expected_removed = arrivals.iter().filter(|&&t| t <= now && now - t >= expiry).count();
        let removed = buf.purge_expired_pending_at(clock.at_secs(now));
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(buf.pending_len(), arrivals.len() - expected_removed);

        prop_assert_eq!(buf.purge_expired_pending_at(clock.at_secs(now)), 0);
        prop_assert_eq!(buf.pending_len(), arrivals.len() - expected_removed);
    }
}
