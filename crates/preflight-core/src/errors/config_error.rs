/// Startup configuration errors. These are fatal: initialization aborts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("encryption key missing: set ENCRYPTION_KEY or provide encryption_key_hex")]
    MissingKey,

    #[error("encryption key malformed: {detail}")]
    MalformedKey { detail: String },

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
