//! # preflight-store
//!
//! Durable storage for the interaction log: an append-only table of
//! per-field encrypted records with an auto-increment primary key, plus
//! the small key-value table backing the app id and the deterministic IV
//! map. Saves notify subscribers only after the transaction commits.

pub mod connection;
pub mod kv;
pub mod log;
pub mod migrations;
pub mod queries;

pub use connection::WriteConnection;
pub use kv::SqliteKeyValue;
pub use log::InteractionLog;

use preflight_core::errors::{PreflightError, StorageError};

/// Shorthand used by every query function.
pub(crate) fn to_storage_err(message: String) -> PreflightError {
    StorageError::Sqlite { message }.into()
}
