//! Default configuration values.

pub const DEFAULT_DATABASE_PATH: &str = "preflight.db";
pub const DEFAULT_HISTORY_LENGTH: usize = 100;
/// Per millisecond. See the field docs on `PreflightConfig::decay_lambda`.
pub const DEFAULT_DECAY_LAMBDA: f64 = 5e-4;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.1;
pub const DEFAULT_WEIGHT_SEQUENCE: f64 = 0.7;
pub const DEFAULT_WEIGHT_TIME: f64 = 0.3;
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 5;
pub const DEFAULT_MIN_ACTIONS_THRESHOLD: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
