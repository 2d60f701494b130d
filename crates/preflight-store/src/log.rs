//! InteractionLog — the encrypted append-only log plus its save bus.

use std::sync::Arc;

use preflight_core::errors::PreflightResult;
use preflight_core::events::{EventDispatcher, InteractionEventHandler};
use preflight_core::models::{EncryptedInteraction, InteractionRecord};
use preflight_crypto::CryptoService;

use crate::connection::WriteConnection;
use crate::queries::interaction_ops;

/// Append-only log of encrypted interactions. Subscribers receive the
/// plaintext record after — and only after — the row is committed.
pub struct InteractionLog {
    conn: WriteConnection,
    crypto: Arc<CryptoService>,
    dispatcher: EventDispatcher,
}

impl InteractionLog {
    pub fn new(conn: WriteConnection, crypto: Arc<CryptoService>) -> Self {
        Self {
            conn,
            crypto,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Encrypt both string fields with fresh random IVs, commit the row,
    /// then notify subscribers in registration order. A failed commit
    /// surfaces the error and notifies nobody.
    pub fn save(&self, record: &InteractionRecord) -> PreflightResult<i64> {
        let action = self.crypto.encrypt(&record.action_type)?;
        let component = self.crypto.encrypt(&record.component_id)?;
        let row = EncryptedInteraction {
            action_type: action.ciphertext,
            action_type_iv: action.iv,
            component_id: component.ciphertext,
            component_id_iv: component.iv,
            timestamp_ms: record.timestamp_ms,
        };

        let id = self
            .conn
            .with_conn(|c| interaction_ops::insert_interaction(c, &row))?;

        self.dispatcher.dispatch_saved(record);
        Ok(id)
    }

    /// All records in insertion order, decrypted per field.
    pub fn list(&self) -> PreflightResult<Vec<InteractionRecord>> {
        let rows = self.conn.with_conn(interaction_ops::list_interactions)?;
        rows.into_iter().map(|row| self.decrypt_row(row)).collect()
    }

    /// First record whose decrypted component id matches.
    ///
    /// The at-rest IVs are random, so the secondary index cannot answer
    /// equality; this is a scan + per-row decrypt.
    pub fn lookup_by_component(
        &self,
        component_id: &str,
    ) -> PreflightResult<Option<InteractionRecord>> {
        let rows = self.conn.with_conn(interaction_ops::list_interactions)?;
        for row in rows {
            let record = self.decrypt_row(row)?;
            if record.component_id == component_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Drop all records.
    pub fn clear(&self) -> PreflightResult<()> {
        self.conn.with_conn(interaction_ops::clear_interactions)
    }

    pub fn count(&self) -> PreflightResult<usize> {
        self.conn.with_conn(interaction_ops::count_interactions)
    }

    /// Register a save listener. Listeners run synchronously on the
    /// saving thread, post-commit.
    pub fn subscribe(&self, handler: Arc<dyn InteractionEventHandler>) {
        self.dispatcher.register(handler);
    }

    fn decrypt_row(&self, row: EncryptedInteraction) -> PreflightResult<InteractionRecord> {
        Ok(InteractionRecord {
            action_type: self.crypto.decrypt(&row.action_type, &row.action_type_iv)?,
            component_id: self
                .crypto
                .decrypt(&row.component_id, &row.component_id_iv)?,
            timestamp_ms: row.timestamp_ms,
        })
    }
}
