//! Event system for the feedback buffer.
//! Trait with no-op defaults, synchronous dispatch, zero overhead when empty.

pub mod handler;
pub mod types;

pub use handler::{FeedbackEventHandler, NoOpEventHandler};
pub use types::*;
