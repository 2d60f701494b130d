//! v002: key-value table for the app id and the deterministic IV map.

use rusqlite::Connection;

use preflight_core::errors::PreflightResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PreflightResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
