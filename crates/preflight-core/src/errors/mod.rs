//! Layered error types. Each subsystem has its own enum; all converge
//! into [`PreflightError`] via `From`.

mod config_error;
mod crypto_error;
mod registry_error;
mod storage_error;
mod sync_error;

pub use config_error::ConfigError;
pub use crypto_error::CryptoError;
pub use registry_error::RegistryError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;

/// Top-level error for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Result alias used across all preflight crates.
pub type PreflightResult<T> = Result<T, PreflightError>;
