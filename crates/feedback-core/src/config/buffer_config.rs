//! Feedback buffer configuration with file and environment resolution.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults;
use crate::constants::{ENV_BAKE_GAP_SECS, ENV_BATCH_SIZE, ENV_EXPIRY_GAP_SECS};
use crate::errors::ConfigError;

/// Bake, expiry, and batching parameters. Fixed once a buffer is built.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`FEEDBACK_*`)
/// 2. TOML file passed to `load`
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Minimum age in seconds before a record is release-eligible.
    pub bake_gap_secs: f64,
    /// Age in seconds at which a record is dropped instead of released.
    /// Must be >= `bake_gap_secs`.
    pub expiry_gap_secs: f64,
    /// Target batch size. Emitted batches hold `batch_size` or `batch_size + 1`.
    pub batch_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            bake_gap_secs: defaults::DEFAULT_BAKE_GAP_SECS,
            expiry_gap_secs: defaults::DEFAULT_EXPIRY_GAP_SECS,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
        }
    }
}

impl BufferConfig {
    /// Create a config from explicit values. Call `validate` before use,
    /// or let the buffer constructor do it.
    pub fn new(bake_gap_secs: f64, expiry_gap_secs: f64, batch_size: usize) -> Self {
        Self {
            bake_gap_secs,
            expiry_gap_secs,
            batch_size,
        }
    }

    pub fn with_bake_gap(mut self, secs: f64) -> Self {
        self.bake_gap_secs = secs;
        self
    }

    pub fn with_expiry_gap(mut self, secs: f64) -> Self {
        self.expiry_gap_secs = secs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Bake gap as a `Duration`. Zero if the configured value is unusable.
    pub fn bake_gap(&self) -> Duration {
        Duration::try_from_secs_f64(self.bake_gap_secs).unwrap_or(Duration::ZERO)
    }

    /// Expiry gap as a `Duration`. Zero if the configured value is unusable.
    pub fn expiry_gap(&self) -> Duration {
        Duration::try_from_secs_f64(self.expiry_gap_secs).unwrap_or(Duration::ZERO)
    }

    /// Load configuration: defaults, then the TOML file at `path`, then
    /// environment overrides. The result is validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let mut config: BufferConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Not validated.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `FEEDBACK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    /// Unparseable values are logged and skipped.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_BAKE_GAP_SECS) {
            match raw.trim().parse::<f64>() {
                Ok(v) => self.bake_gap_secs = v,
                Err(e) => warn!(var = ENV_BAKE_GAP_SECS, value = %raw, error = %e, "ignoring override"),
            }
        }
        if let Some(raw) = lookup(ENV_EXPIRY_GAP_SECS) {
            match raw.trim().parse::<f64>() {
                Ok(v) => self.expiry_gap_secs = v,
                Err(e) => warn!(var = ENV_EXPIRY_GAP_SECS, value = %raw, error = %e, "ignoring override"),
            }
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            match raw.trim().parse::<usize>() {
                Ok(v) => self.batch_size = v,
                Err(e) => warn!(var = ENV_BATCH_SIZE, value = %raw, error = %e, "ignoring override"),
            }
        }
    }

    /// Validate the configuration values.
    ///
    /// `expiry_gap < bake_gap` is rejected: no record could ever be
    /// released and the buffer would silently swallow everything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gap("bake_gap_secs", self.bake_gap_secs)?;
        check_gap("expiry_gap_secs", self.expiry_gap_secs)?;
        if self.expiry_gap_secs < self.bake_gap_secs {
            return Err(ConfigError::ValidationFailed {
                field: "expiry_gap_secs".to_string(),
                message: format!(
                    "must be >= bake_gap_secs ({} < {})",
                    self.expiry_gap_secs, self.bake_gap_secs
                ),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn check_gap(field: &str, secs: f64) -> Result<(), ConfigError> {
    if Duration::try_from_secs_f64(secs).is_err() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{secs} is not a finite, non-negative number of seconds"),
        });
    }
    Ok(())
}
