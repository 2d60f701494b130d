//! The single serialized write connection.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::Connection;

use preflight_core::errors::PreflightResult;

use crate::to_storage_err;

/// All reads and writes go through one mutex-guarded connection, which
/// serializes the save critical section (encrypt → transaction → commit →
/// notify) the same way a single-threaded event loop would.
#[derive(Clone)]
pub struct WriteConnection {
    conn: Arc<Mutex<Connection>>,
}

impl WriteConnection {
    /// Open (or create) the database file and apply pragmas + migrations.
    pub fn open(path: &Path) -> PreflightResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(format!("open: {e}")))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| to_storage_err(format!("pragmas: {e}")))?;
        let this = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        this.with_conn(crate::migrations::run_migrations)?;
        Ok(this)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> PreflightResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| to_storage_err(format!("open: {e}")))?;
        let this = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        this.with_conn(crate::migrations::run_migrations)?;
        Ok(this)
    }

    /// Run a closure against the connection under the write lock.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> PreflightResult<T>,
    ) -> PreflightResult<T> {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}
