//! v001: the encrypted interaction log.
//!
//! Both string columns hold base64 AES-GCM output with a per-field IV.
//! The index on the encrypted component id is unusable for equality
//! lookups while IVs are random; it is retained for debugging and for a
//! possible future switch to deterministic component ids.

use rusqlite::Connection;

use preflight_core::errors::PreflightResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PreflightResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS interactions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            action_type     TEXT NOT NULL,
            action_type_iv  TEXT NOT NULL,
            component_id    TEXT NOT NULL,
            component_id_iv TEXT NOT NULL,
            timestamp_ms    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_interactions_component
            ON interactions(component_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
