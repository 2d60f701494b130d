//! [`KeyValueStore`] implementation over the `kv` table.

use preflight_core::errors::PreflightResult;
use preflight_core::traits::KeyValueStore;

use crate::connection::WriteConnection;
use crate::queries::kv_ops;

pub struct SqliteKeyValue {
    conn: WriteConnection,
}

impl SqliteKeyValue {
    pub fn new(conn: WriteConnection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValue {
    fn get(&self, key: &str) -> PreflightResult<Option<String>> {
        self.conn.with_conn(|c| kv_ops::kv_get(c, key))
    }

    fn put(&self, key: &str, value: &str) -> PreflightResult<()> {
        self.conn.with_conn(|c| kv_ops::kv_put(c, key, value))
    }
}
