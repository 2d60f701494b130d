//! Versioned schema migrations keyed on `PRAGMA user_version`.

mod v001_interactions;
mod v002_kv;

use rusqlite::Connection;

use preflight_core::errors::{PreflightResult, StorageError};

use crate::to_storage_err;

const SCHEMA_VERSION: u32 = 2;

pub fn run_migrations(conn: &Connection) -> PreflightResult<()> {
    let version: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| to_storage_err(format!("user_version: {e}")))?;

    if version < 1 {
        v001_interactions::migrate(conn).map_err(|e| migration_err(1, e))?;
    }
    if version < 2 {
        v002_kv::migrate(conn).map_err(|e| migration_err(2, e))?;
    }

    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| to_storage_err(format!("set user_version: {e}")))?;
        tracing::info!("store: migrated schema {version} -> {SCHEMA_VERSION}");
    }
    Ok(())
}

fn migration_err(version: u32, source: preflight_core::errors::PreflightError) -> preflight_core::errors::PreflightError {
    StorageError::MigrationFailed {
        version,
        reason: source.to_string(),
    }
    .into()
}
