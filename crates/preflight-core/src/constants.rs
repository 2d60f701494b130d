//! Workspace-wide constants: persisted key names and model bounds.

/// Key-value key under which the server-issued app id is persisted.
pub const KV_KEY_APP_ID: &str = "prediction_model_app_id";

/// Key-value key under which the deterministic IV map is persisted,
/// as a JSON array of `[plaintext, ivBase64]` pairs.
pub const KV_KEY_IV_MAP: &str = "ivMap";

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Score differences below this are treated as ties; the earlier
/// insertion wins.
pub const TIE_EPSILON: f64 = 1e-6;

/// Maximum number of distinct actions accepted from a server-supplied
/// global model. Anything beyond is dropped.
pub const MAX_GLOBAL_ACTIONS: usize = 512;

/// Per-action count ceiling applied to server-supplied global models.
pub const MAX_GLOBAL_COUNT: u64 = 1_000_000;
