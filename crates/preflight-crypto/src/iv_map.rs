//! Persistent plaintext → IV map backing deterministic encryption.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use preflight_core::constants::{KV_KEY_IV_MAP, NONCE_LEN};
use preflight_core::errors::{CryptoError, PreflightResult};
use preflight_core::traits::KeyValueStore;

/// Append-only map from plaintext to its pinned IV. Persisted as a JSON
/// array of `[plaintext, ivBase64]` pairs so the entry order survives
/// reloads. Once written, an entry is never mutated.
pub(crate) struct DeterministicIvMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, [u8; NONCE_LEN]>,
}

impl DeterministicIvMap {
    /// Load from the key-value store; a missing entry is an empty map.
    pub(crate) fn load(kv: &dyn KeyValueStore) -> PreflightResult<Self> {
        let entries: Vec<(String, String)> = match kv.get(KV_KEY_IV_MAP)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| CryptoError::InvalidEncoding {
                detail: format!("stored IV map is not valid JSON: {e}"),
            })?,
            None => Vec::new(),
        };

        let mut index = HashMap::with_capacity(entries.len());
        for (plaintext, iv_b64) in &entries {
            index.insert(plaintext.clone(), decode_iv(iv_b64)?);
        }
        Ok(Self { entries, index })
    }

    pub(crate) fn get(&self, plaintext: &str) -> Option<[u8; NONCE_LEN]> {
        self.index.get(plaintext).copied()
    }

    /// Record a fresh IV for a plaintext and write the whole map through
    /// to the key-value store. The write happens before any ciphertext
    /// derived from the new IV leaves the crypto service.
    pub(crate) fn insert_and_persist(
        &mut self,
        plaintext: &str,
        iv: [u8; NONCE_LEN],
        kv: &dyn KeyValueStore,
    ) -> PreflightResult<()> {
        self.entries
            .push((plaintext.to_string(), BASE64.encode(iv)));
        self.index.insert(plaintext.to_string(), iv);

        let serialized = serde_json::to_string(&self.entries).map_err(|e| {
            CryptoError::InvalidEncoding {
                detail: format!("IV map serialization failed: {e}"),
            }
        })?;
        kv.put(KV_KEY_IV_MAP, &serialized)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn decode_iv(iv_b64: &str) -> PreflightResult<[u8; NONCE_LEN]> {
    let raw = BASE64
        .decode(iv_b64.as_bytes())
        .map_err(|e| CryptoError::InvalidEncoding {
            detail: format!("IV is not valid base64: {e}"),
        })?;
    raw.try_into().map_err(|_| {
        CryptoError::InvalidEncoding {
            detail: format!("IV must be {NONCE_LEN} bytes"),
        }
        .into()
    })
}
