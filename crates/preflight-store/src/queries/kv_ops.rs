//! Key-value table access.

use rusqlite::{params, Connection, OptionalExtension};

use preflight_core::errors::PreflightResult;

use crate::to_storage_err;

pub fn kv_get(conn: &Connection, key: &str) -> PreflightResult<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn kv_put(conn: &Connection, key: &str, value: &str) -> PreflightResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
