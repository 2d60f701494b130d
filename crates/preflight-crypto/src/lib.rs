//! # preflight-crypto
//!
//! AES-256-GCM encryption for interaction records and anonymized uploads.
//! Two modes:
//!
//! | Mode | IV | Used for |
//! |------|----|----------|
//! | `encrypt` | fresh random 12 bytes | at-rest interaction fields |
//! | `encrypt_deterministic` | persistent per-plaintext | server-joinable upload keys |
//!
//! Deterministic mode makes ciphertexts of equal plaintexts bytewise
//! equal, so the aggregation server can join and count them without ever
//! seeing an action name. Only upload keys go through this mode; at-rest
//! records always use random IVs so no equality is leakable from the
//! database file.
//!
//! The key ships with the client. That protects action names from the
//! server operator, not from someone holding the deployed bundle; treat
//! the scheme as privacy toward the aggregator, not end-to-end secrecy.

mod iv_map;
mod service;

pub use service::{CipherText, CryptoService};
