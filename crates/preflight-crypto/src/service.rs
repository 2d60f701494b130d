//! The crypto service: key import, both encryption modes, decryption.

use std::sync::{Arc, Mutex, PoisonError};

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use preflight_core::constants::NONCE_LEN;
use preflight_core::errors::{ConfigError, CryptoError, PreflightResult};
use preflight_core::traits::KeyValueStore;

use crate::iv_map::DeterministicIvMap;

const KEY_LEN: usize = 32;
const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// An encryption result: both fields base64-encoded for transport and
/// storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherText {
    pub ciphertext: String,
    pub iv: String,
}

/// AES-256-GCM service shared by the interaction log and the uploader.
pub struct CryptoService {
    cipher: Aes256Gcm,
    kv: Arc<dyn KeyValueStore>,
    iv_map: Mutex<DeterministicIvMap>,
}

impl std::fmt::Debug for CryptoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoService").finish_non_exhaustive()
    }
}

impl CryptoService {
    /// Import a 64-character hex key and load the persisted IV map.
    /// An ill-formed key fails fast at startup.
    pub fn from_hex_key(key_hex: &str, kv: Arc<dyn KeyValueStore>) -> PreflightResult<Self> {
        let trimmed = key_hex.trim();
        if trimmed.len() != KEY_HEX_LEN {
            return Err(ConfigError::MalformedKey {
                detail: format!(
                    "expected {KEY_HEX_LEN} hex characters, got {}",
                    trimmed.len()
                ),
            }
            .into());
        }
        let key_bytes = hex::decode(trimmed).map_err(|e| ConfigError::MalformedKey {
            detail: e.to_string(),
        })?;
        let cipher = Aes256Gcm::new_from_slice(&key_bytes).map_err(|e| CryptoError::KeyImport {
            reason: e.to_string(),
        })?;
        let iv_map = DeterministicIvMap::load(kv.as_ref())?;
        Ok(Self {
            cipher,
            kv,
            iv_map: Mutex::new(iv_map),
        })
    }

    /// Encrypt with a fresh random IV. Every call produces a different
    /// ciphertext, so nothing is joinable at rest.
    pub fn encrypt(&self, plaintext: &str) -> PreflightResult<CipherText> {
        let mut iv = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut iv);
        self.seal(plaintext, &iv)
    }

    /// Encrypt with the plaintext's pinned IV, generating and persisting
    /// one on first use. Equal plaintexts yield bytewise-equal output
    /// within and across sessions, which is what makes the upload
    /// histogram joinable server-side.
    pub fn encrypt_deterministic(&self, plaintext: &str) -> PreflightResult<CipherText> {
        let iv = {
            let mut map = self.iv_map.lock().unwrap_or_else(PoisonError::into_inner);
            match map.get(plaintext) {
                Some(iv) => iv,
                None => {
                    let mut iv = [0u8; NONCE_LEN];
                    OsRng.fill_bytes(&mut iv);
                    // The map must be durable before the derived
                    // ciphertext escapes the process.
                    map.insert_and_persist(plaintext, iv, self.kv.as_ref())?;
                    iv
                }
            }
        };
        self.seal(plaintext, &iv)
    }

    /// Decrypt a base64 ciphertext with its IV.
    pub fn decrypt(&self, ciphertext_b64: &str, iv_b64: &str) -> PreflightResult<String> {
        let ciphertext = BASE64
            .decode(ciphertext_b64.as_bytes())
            .map_err(|e| CryptoError::InvalidEncoding {
                detail: format!("ciphertext is not valid base64: {e}"),
            })?;
        let iv = BASE64
            .decode(iv_b64.as_bytes())
            .map_err(|e| CryptoError::InvalidEncoding {
                detail: format!("IV is not valid base64: {e}"),
            })?;
        if iv.len() != NONCE_LEN {
            return Err(CryptoError::InvalidEncoding {
                detail: format!("IV must be {NONCE_LEN} bytes, got {}", iv.len()),
            }
            .into());
        }
        let nonce = Nonce::from_slice(&iv);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| CryptoError::DecryptionFailure)?;
        String::from_utf8(plaintext).map_err(|_| {
            CryptoError::InvalidEncoding {
                detail: "decrypted payload is not UTF-8".to_string(),
            }
            .into()
        })
    }

    /// Number of plaintexts with a pinned IV.
    pub fn deterministic_entries(&self) -> usize {
        self.iv_map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn seal(&self, plaintext: &str, iv: &[u8; NONCE_LEN]) -> PreflightResult<CipherText> {
        let nonce = Nonce::from_slice(iv);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailure)?;
        Ok(CipherText {
            ciphertext: BASE64.encode(ciphertext),
            iv: BASE64.encode(iv),
        })
    }
}
