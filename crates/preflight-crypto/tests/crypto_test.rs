use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use preflight_core::constants::KV_KEY_IV_MAP;
use preflight_core::errors::{PreflightError, PreflightResult};
use preflight_core::traits::KeyValueStore;
use preflight_crypto::CryptoService;

// ── Mock key-value store ─────────────────────────────────────────────────

#[derive(Default)]
struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> PreflightResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> PreflightResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

fn service() -> (CryptoService, Arc<MemoryKv>) {
    let kv = Arc::new(MemoryKv::default());
    let service = CryptoService::from_hex_key(KEY_HEX, kv.clone()).unwrap();
    (service, kv)
}

// ── Key import ───────────────────────────────────────────────────────────

#[test]
fn rejects_short_key() {
    let kv = Arc::new(MemoryKv::default());
    let err = CryptoService::from_hex_key("abcd", kv).unwrap_err();
    assert!(matches!(err, PreflightError::Config(_)), "got {err:?}");
}

#[test]
fn rejects_non_hex_key() {
    let kv = Arc::new(MemoryKv::default());
    let bad = "zz".repeat(32);
    let err = CryptoService::from_hex_key(&bad, kv).unwrap_err();
    assert!(matches!(err, PreflightError::Config(_)), "got {err:?}");
}

#[test]
fn accepts_key_with_surrounding_whitespace() {
    let kv = Arc::new(MemoryKv::default());
    let padded = format!("  {KEY_HEX}\n");
    assert!(CryptoService::from_hex_key(&padded, kv).is_ok());
}

// ── Random-IV mode ───────────────────────────────────────────────────────

#[test]
fn encrypt_decrypt_roundtrip() {
    let (service, _) = service();
    let sealed = service.encrypt("click-login").unwrap();
    assert_eq!(service.decrypt(&sealed.ciphertext, &sealed.iv).unwrap(), "click-login");
}

#[test]
fn random_mode_never_repeats_ciphertext() {
    let (service, _) = service();
    let a = service.encrypt("open-settings").unwrap();
    let b = service.encrypt("open-settings").unwrap();
    assert_ne!(a.iv, b.iv);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn tampered_ciphertext_fails_tag_check() {
    let (service, _) = service();
    let sealed = service.encrypt("click-cart").unwrap();
    // Swap in a ciphertext of the same shape but different content.
    let other = service.encrypt("click-cart").unwrap();
    let err = service.decrypt(&other.ciphertext, &sealed.iv).unwrap_err();
    assert!(matches!(err, PreflightError::Crypto(_)), "got {err:?}");
}

// ── Deterministic mode ───────────────────────────────────────────────────

#[test]
fn deterministic_mode_is_stable_within_a_session() {
    let (service, _) = service();
    let first = service.encrypt_deterministic("clickX").unwrap();
    let second = service.encrypt_deterministic("clickX").unwrap();
    assert_eq!(first, second);
}

#[test]
fn deterministic_mode_survives_reload() {
    let kv = Arc::new(MemoryKv::default());
    let first = CryptoService::from_hex_key(KEY_HEX, kv.clone())
        .unwrap()
        .encrypt_deterministic("clickX")
        .unwrap();

    // A fresh service over the same key-value store sees the same map.
    let second = CryptoService::from_hex_key(KEY_HEX, kv)
        .unwrap()
        .encrypt_deterministic("clickX")
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn deterministic_mode_persists_map_before_returning() {
    let (service, kv) = service();
    service.encrypt_deterministic("go-home").unwrap();
    let stored = kv.get(KV_KEY_IV_MAP).unwrap().expect("map should be persisted");
    let pairs: Vec<(String, String)> = serde_json::from_str(&stored).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0, "go-home");
}

#[test]
fn distinct_plaintexts_get_distinct_ivs() {
    let (service, _) = service();
    let a = service.encrypt_deterministic("action-a").unwrap();
    let b = service.encrypt_deterministic("action-b").unwrap();
    assert_ne!(a.iv, b.iv);
    assert_eq!(service.deterministic_entries(), 2);
}

#[test]
fn deterministic_output_decrypts_with_plain_decrypt() {
    let (service, _) = service();
    let sealed = service.encrypt_deterministic("view-profile").unwrap();
    assert_eq!(
        service.decrypt(&sealed.ciphertext, &sealed.iv).unwrap(),
        "view-profile"
    );
}

// ── Property: round-trip identity ────────────────────────────────────────

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_identity(plaintext in ".{0,256}") {
            let kv = Arc::new(MemoryKv::default());
            let service = CryptoService::from_hex_key(KEY_HEX, kv).unwrap();
            let sealed = service.encrypt(&plaintext).unwrap();
            prop_assert_eq!(service.decrypt(&sealed.ciphertext, &sealed.iv).unwrap(), plaintext);
        }
    }
}
