//! SyncEngine — registration, anonymized upload, global-model fetch.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use preflight_core::constants::KV_KEY_APP_ID;
use preflight_core::errors::{PreflightResult, SyncError};
use preflight_core::models::{GlobalModel, InteractionRecord};
use preflight_core::traits::KeyValueStore;
use preflight_crypto::CryptoService;

use crate::http::{HttpClient, HttpClientConfig};
use crate::protocol::{AnonymizedCount, GlobalModelResponse, RegisterAppResponse, UploadRequest};

/// Client side of the aggregation protocol. Holds the installation's app
/// id; all failures degrade to local-only operation.
pub struct SyncEngine {
    client: HttpClient,
    crypto: Arc<CryptoService>,
    kv: Arc<dyn KeyValueStore>,
    app_id: Mutex<Option<String>>,
}

impl SyncEngine {
    pub fn new(
        config: HttpClientConfig,
        crypto: Arc<CryptoService>,
        kv: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client: HttpClient::new(config),
            crypto,
            kv,
            app_id: Mutex::new(None),
        }
    }

    /// Load the persisted app id, or register with the server. An HTTP
    /// failure yields a session-local `fallback-<ms>` id: uploads made
    /// with it will be rejected server-side, which is acceptable — local
    /// prediction keeps working either way. Only server-issued ids are
    /// persisted.
    pub fn register(&self) -> String {
        match self.kv.get(KV_KEY_APP_ID) {
            Ok(Some(stored)) => {
                *self.lock_app_id() = Some(stored.clone());
                return stored;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("sync: app id lookup failed: {e}"),
        }

        let app_id = match self
            .client
            .post::<serde_json::Value, RegisterAppResponse>("/register-app", None)
        {
            Ok(response) => {
                if let Err(e) = self.kv.put(KV_KEY_APP_ID, &response.app_id) {
                    tracing::warn!("sync: failed to persist app id: {e}");
                }
                tracing::info!("sync: registered app {}", response.app_id);
                response.app_id
            }
            Err(e) => {
                let fallback = format!("fallback-{}", Utc::now().timestamp_millis());
                tracing::warn!("sync: registration failed ({e}), continuing as {fallback}");
                fallback
            }
        };

        *self.lock_app_id() = Some(app_id.clone());
        app_id
    }

    /// Current app id, if registration has run.
    pub fn app_id(&self) -> Option<String> {
        self.lock_app_id().clone()
    }

    /// Upload per-action counts over the given history snapshot, each
    /// action name deterministically encrypted so the server can join
    /// equal actions across clients without reading them. No-op on an
    /// empty snapshot or when no app id is held. Returns the number of
    /// distinct actions uploaded.
    pub fn upload(&self, history: &[InteractionRecord]) -> PreflightResult<usize> {
        if history.is_empty() {
            tracing::debug!("sync: history empty, skipping upload");
            return Ok(0);
        }
        let Some(app_id) = self.app_id() else {
            tracing::debug!("sync: no app id, skipping upload");
            return Ok(0);
        };

        let mut interactions = Vec::new();
        for (action, count) in count_actions(history) {
            let sealed = self.crypto.encrypt_deterministic(&action)?;
            interactions.push(AnonymizedCount {
                action_type: sealed.ciphertext,
                action_type_iv: sealed.iv,
                count,
            });
        }

        let uploaded = interactions.len();
        let request = UploadRequest {
            app_id,
            interactions,
        };
        self.client
            .post_unit("/upload-anonymous-data", Some(&request))?;
        tracing::info!("sync: uploaded {uploaded} anonymized action counts");
        Ok(uploaded)
    }

    /// Fetch the server-aggregated model and decrypt its keys back into
    /// plaintext action names.
    pub fn fetch_global_model(&self) -> PreflightResult<GlobalModel> {
        let Some(app_id) = self.app_id() else {
            return Err(SyncError::NetworkError {
                reason: "no app id available".into(),
            }
            .into());
        };

        let response: GlobalModelResponse =
            self.client.get(&format!("/global-model/{app_id}"))?;
        self.decrypt_global_model(response)
    }

    /// Every ciphertext key must come with its IV; anything else is a
    /// protocol mismatch, which callers treat like any network failure.
    fn decrypt_global_model(&self, response: GlobalModelResponse) -> PreflightResult<GlobalModel> {
        let mut model = GlobalModel::default();

        for (ciphertext, count) in &response.global_action_counter {
            let iv = response
                .global_action_counter_ivs
                .get(ciphertext)
                .ok_or_else(|| mismatch("counter entry without IV"))?;
            let action = self
                .crypto
                .decrypt(ciphertext, iv)
                .map_err(|e| mismatch(&format!("undecryptable counter key: {e}")))?;
            model.action_counts.insert(action, *count);
        }

        for (ciphertext, hours) in &response.time_patterns {
            let iv = response
                .time_patterns_ivs
                .get(ciphertext)
                .ok_or_else(|| mismatch("time pattern without IV"))?;
            let action = self
                .crypto
                .decrypt(ciphertext, iv)
                .map_err(|e| mismatch(&format!("undecryptable time pattern key: {e}")))?;
            let mut histogram = [0u64; 24];
            for (hour, count) in hours {
                if let Some(slot) = histogram.get_mut(*hour as usize) {
                    *slot = *count;
                }
            }
            model.time_patterns.insert(action, histogram);
        }

        Ok(model)
    }

    fn lock_app_id(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.app_id.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-action counts over a history snapshot, in first-seen order so the
/// upload body is reproducible.
fn count_actions(history: &[InteractionRecord]) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for record in history {
        match counts.iter_mut().find(|(a, _)| *a == record.action_type) {
            Some((_, c)) => *c += 1,
            None => counts.push((record.action_type.clone(), 1)),
        }
    }
    counts
}

fn mismatch(detail: &str) -> preflight_core::errors::PreflightError {
    SyncError::ProtocolMismatch {
        detail: detail.to_string(),
    }
    .into()
}
