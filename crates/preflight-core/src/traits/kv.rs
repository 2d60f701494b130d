use crate::errors::PreflightResult;

/// Small persistent key-value surface used for the app id and the
/// deterministic IV map. Backed by SQLite in production.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PreflightResult<Option<String>>;

    /// Insert or overwrite. Must be durable before returning.
    fn put(&self, key: &str, value: &str) -> PreflightResult<()>;
}
