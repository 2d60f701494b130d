/// Remote sync errors. Never fatal: callers log and continue locally.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("network error: {reason}")]
    NetworkError { reason: String },

    #[error("unexpected server response: {detail}")]
    ProtocolMismatch { detail: String },
}
