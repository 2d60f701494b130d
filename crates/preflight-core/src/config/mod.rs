//! Library configuration with serde defaults and validation.

mod defaults;

pub use defaults::*;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, PreflightResult};

/// Tuning knobs for the whole library. All fields are optional when
/// deserialized; missing fields take the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Base URL of the aggregation server. Remote sync is disabled when
    /// unset; everything else keeps working locally.
    pub server_url: Option<String>,
    /// Path of the SQLite database file. `:memory:` is accepted for tests.
    pub database_path: String,
    /// 64-character hex encryption key. Overrides the `ENCRYPTION_KEY`
    /// environment variable when set.
    pub encryption_key_hex: Option<String>,
    /// Hard cap on the in-memory interaction history.
    pub history_length: usize,
    /// Exponential decay rate applied to sequence evidence, **per
    /// millisecond**. The default of `5e-4` gives a half-life of roughly
    /// 1.4 seconds, which weights predictions heavily toward the most
    /// recent interactions; deployments wanting hour-scale memory should
    /// configure something on the order of `1e-7`.
    pub decay_lambda: f64,
    /// Laplace smoothing factor for transition rows.
    pub smoothing_factor: f64,
    /// Weight of the sequence distribution in the combined score.
    pub weight_sequence: f64,
    /// Weight of the time-of-day distribution in the combined score.
    pub weight_time: f64,
    /// Longest pattern window tracked by the transition matrix.
    pub max_pattern_length: usize,
    /// Below this many replayed interactions the global model is fetched
    /// to seed predictions.
    pub min_actions_threshold: usize,
    /// Timeout for every remote request, in seconds.
    pub request_timeout_secs: u64,
    /// Retry budget for remote requests.
    pub max_retries: u32,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            encryption_key_hex: None,
            history_length: DEFAULT_HISTORY_LENGTH,
            decay_lambda: DEFAULT_DECAY_LAMBDA,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            weight_sequence: DEFAULT_WEIGHT_SEQUENCE,
            weight_time: DEFAULT_WEIGHT_TIME,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            min_actions_threshold: DEFAULT_MIN_ACTIONS_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl PreflightConfig {
    /// Reject values the model cannot operate with. Weights need not be
    /// normalized, but they must be non-negative.
    pub fn validate(&self) -> PreflightResult<()> {
        fn invalid(field: &str, message: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field: field.to_string(),
                message: message.to_string(),
            }
        }

        if self.history_length == 0 {
            return Err(invalid("history_length", "must be at least 1").into());
        }
        if self.max_pattern_length == 0 {
            return Err(invalid("max_pattern_length", "must be at least 1").into());
        }
        if !self.decay_lambda.is_finite() || self.decay_lambda < 0.0 {
            return Err(invalid("decay_lambda", "must be finite and non-negative").into());
        }
        if !self.smoothing_factor.is_finite() || self.smoothing_factor < 0.0 {
            return Err(invalid("smoothing_factor", "must be finite and non-negative").into());
        }
        if !self.weight_sequence.is_finite() || self.weight_sequence < 0.0 {
            return Err(invalid("weight_sequence", "must be finite and non-negative").into());
        }
        if !self.weight_time.is_finite() || self.weight_time < 0.0 {
            return Err(invalid("weight_time", "must be finite and non-negative").into());
        }
        Ok(())
    }
}
