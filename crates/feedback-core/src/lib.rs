//! # feedback-core
//!
//! Foundation crate for the feedback bake buffer.
//! Defines config, errors, the clock and event-handler traits, tracing
//! setup, and constants. The buffering engine lives in `feedback-queue`.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod logging;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{ManualClock, MonotonicClock};
pub use config::BufferConfig;
pub use errors::{BufferError, ConfigError, FeedbackResult};
pub use events::{FeedbackEventHandler, FeedbackKind, NoOpEventHandler};
pub use traits::IClock;
