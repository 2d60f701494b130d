/// Per-operation crypto failures.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key import failed: {reason}")]
    KeyImport { reason: String },

    #[error("encryption failed")]
    EncryptionFailure,

    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailure,

    #[error("invalid encoding: {detail}")]
    InvalidEncoding { detail: String },
}
