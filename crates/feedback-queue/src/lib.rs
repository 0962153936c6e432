//! # feedback-queue
//!
//! Bake/expiry buffer for feedback events.
//! Negative feedback is queued immediately; positive feedback waits in a
//! pending map until confirmed by ID. Both streams are released once baked,
//! dropped once expired, and handed out in batches.

pub mod batch;
pub mod buffer;
pub mod record;
pub mod shared;
pub mod stats;

pub use batch::BatchIter;
pub use buffer::{ConfirmOutcome, FeedbackBuffer};
pub use record::FeedbackRecord;
pub use shared::SharedFeedbackBuffer;
pub use stats::BufferStats;
