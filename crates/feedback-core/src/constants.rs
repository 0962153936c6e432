/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "FEEDBACK_LOG";

/// Filter used when `FEEDBACK_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "feedback_core=info,feedback_queue=info";

/// Environment overrides for `BufferConfig`.
pub const ENV_BAKE_GAP_SECS: &str = "FEEDBACK_BAKE_GAP_SECS";
pub const ENV_EXPIRY_GAP_SECS: &str = "FEEDBACK_EXPIRY_GAP_SECS";
pub const ENV_BATCH_SIZE: &str = "FEEDBACK_BATCH_SIZE";
