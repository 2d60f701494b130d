//! # preflight-sync
//!
//! Cooperation with the remote aggregator:
//!
//! 1. **Registration** — obtain (or fall back to) an opaque app id.
//! 2. **Daily upload** — a histogram of deterministically encrypted
//!    action names with counts, scheduled at local midnight.
//! 3. **Global model** — server-aggregated counters, decrypted and handed
//!    to the prediction model to seed cold clients.
//!
//! Everything here is best-effort: network failures are logged and local
//! operation continues untouched.

pub mod engine;
pub mod http;
pub mod protocol;
pub mod scheduler;

pub use engine::SyncEngine;
pub use http::{HttpClient, HttpClientConfig};
pub use scheduler::UploadScheduler;
