// Single source of truth for all default values.

/// Minimum age (seconds) before a record may be released.
pub const DEFAULT_BAKE_GAP_SECS: f64 = 20.0;

/// Age (seconds) at which a record is dropped instead of released.
pub const DEFAULT_EXPIRY_GAP_SECS: f64 = 200.0;

/// Target number of payloads per emitted batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;
