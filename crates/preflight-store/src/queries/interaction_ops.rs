//! Insert, list, clear, count for the encrypted interaction table.

use rusqlite::{params, Connection};

use preflight_core::errors::{PreflightResult, StorageError};
use preflight_core::models::EncryptedInteraction;

use crate::to_storage_err;

/// Insert one encrypted row. The transaction makes the row all-or-nothing;
/// the ciphertext was fully produced before the transaction opened, so a
/// partial write cannot exist.
pub fn insert_interaction(conn: &Connection, row: &EncryptedInteraction) -> PreflightResult<i64> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| storage_tx(format!("insert begin: {e}")))?;

    tx.execute(
        "INSERT INTO interactions (
            action_type, action_type_iv, component_id, component_id_iv, timestamp_ms
        ) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            row.action_type,
            row.action_type_iv,
            row.component_id,
            row.component_id_iv,
            row.timestamp_ms,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let id = tx.last_insert_rowid();
    tx.commit()
        .map_err(|e| storage_tx(format!("insert commit: {e}")))?;
    Ok(id)
}

/// All rows in insertion order.
pub fn list_interactions(conn: &Connection) -> PreflightResult<Vec<EncryptedInteraction>> {
    let mut stmt = conn
        .prepare(
            "SELECT action_type, action_type_iv, component_id, component_id_iv, timestamp_ms
             FROM interactions ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(EncryptedInteraction {
                action_type: row.get(0)?,
                action_type_iv: row.get(1)?,
                component_id: row.get(2)?,
                component_id_iv: row.get(3)?,
                timestamp_ms: row.get(4)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn clear_interactions(conn: &Connection) -> PreflightResult<()> {
    conn.execute("DELETE FROM interactions", [])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn count_interactions(conn: &Connection) -> PreflightResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM interactions", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}

fn storage_tx(message: String) -> preflight_core::errors::PreflightError {
    StorageError::Transaction { message }.into()
}
