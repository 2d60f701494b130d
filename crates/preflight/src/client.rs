//! Preflight — service wiring and the public application surface.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use preflight_core::config::PreflightConfig;
use preflight_core::errors::{ConfigError, PreflightResult};
use preflight_core::models::{InteractionRecord, Prediction};
use preflight_core::traits::{AssetFetcher, KeyValueStore, NoopFetcher};
use preflight_crypto::CryptoService;
use preflight_prediction::PredictionModel;
use preflight_preload::PreloadCache;
use preflight_registry::ComponentRegistry;
use preflight_store::{InteractionLog, SqliteKeyValue, WriteConnection};
use preflight_sync::{HttpClientConfig, SyncEngine, UploadScheduler};

use crate::handler::ModelUpdateHandler;

/// The assembled library: explicit services created once at init and
/// shared by reference, no hidden global state.
pub struct Preflight {
    registry: Arc<ComponentRegistry>,
    log: Arc<InteractionLog>,
    model: Arc<PredictionModel>,
    preload: Arc<PreloadCache>,
    sync: Option<Arc<SyncEngine>>,
    scheduler: Option<UploadScheduler>,
}

impl std::fmt::Debug for Preflight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preflight").finish_non_exhaustive()
    }
}

impl Preflight {
    /// Initialize with the default no-op asset fetcher. See
    /// [`init_with_fetcher`](Self::init_with_fetcher).
    pub fn init(config: PreflightConfig) -> PreflightResult<Self> {
        Self::init_with_fetcher(config, Arc::new(NoopFetcher))
    }

    /// Initialize every service and replay the durable log into the
    /// model. When a server is configured this also registers the
    /// installation, seeds from the global model if local data is thin,
    /// and starts the daily upload schedule.
    ///
    /// Configuration problems (bad values, missing encryption key) abort
    /// here; after a successful init no operation fails the application.
    pub fn init_with_fetcher(
        config: PreflightConfig,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> PreflightResult<Self> {
        config.validate()?;
        let key_hex = resolve_key(&config)?;

        let conn = if config.database_path == ":memory:" {
            WriteConnection::open_in_memory()?
        } else {
            WriteConnection::open(Path::new(&config.database_path))?
        };
        let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValue::new(conn.clone()));
        let crypto = Arc::new(CryptoService::from_hex_key(&key_hex, kv.clone())?);

        let registry = Arc::new(ComponentRegistry::new());
        let log = Arc::new(InteractionLog::new(conn, crypto.clone()));
        let model = Arc::new(PredictionModel::new(config.clone(), registry.clone()));
        let preload = Arc::new(PreloadCache::new(registry.clone(), fetcher));

        // Rebuild the in-memory model from the durable log before any
        // live updates can arrive.
        model.replay(log.list()?);

        // From here on, every committed save flows into the model and
        // refreshes the preload cache.
        log.subscribe(Arc::new(ModelUpdateHandler::new(
            model.clone(),
            preload.clone(),
        )));

        let (sync, scheduler) = match &config.server_url {
            Some(server_url) => {
                let http = HttpClientConfig {
                    base_url: server_url.clone(),
                    timeout: Duration::from_secs(config.request_timeout_secs),
                    max_retries: config.max_retries,
                    ..Default::default()
                };
                let engine = Arc::new(SyncEngine::new(http, crypto.clone(), kv.clone()));
                engine.register();

                if model.needs_global_seed() {
                    match engine.fetch_global_model() {
                        Ok(global) if !global.is_empty() => model.install_global_model(&global),
                        Ok(_) => tracing::debug!("init: global model is empty, nothing to seed"),
                        Err(e) => tracing::warn!("init: global model fetch failed: {e}"),
                    }
                }

                let snapshot_model = model.clone();
                let scheduler = UploadScheduler::start(engine.clone(), move || {
                    snapshot_model.history_snapshot()
                });
                (Some(engine), Some(scheduler))
            }
            None => (None, None),
        };

        // Prime the cache with whatever the replayed model expects first.
        preload.preload_next_prediction(&model, Utc::now().timestamp_millis());

        Ok(Self {
            registry,
            log,
            model,
            preload,
            sync,
            scheduler,
        })
    }

    /// Register a preloadable component. Duplicate ids warn and keep the
    /// original descriptor.
    pub fn track_component(
        &self,
        id: &str,
        kind: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        self.registry.track_component(id, kind, metadata);
    }

    /// Bind an action type to a tracked component.
    pub fn associate_action_with_component(
        &self,
        action_type: &str,
        component_id: &str,
    ) -> PreflightResult<()> {
        self.registry.associate_action(action_type, component_id)
    }

    /// Report a user interaction. Resolves the bound component, persists
    /// the encrypted record, and lets the save bus update the model and
    /// the preload cache. Unbound actions and storage failures are
    /// logged, never raised.
    pub fn track_interaction(&self, action_type: &str) {
        let Some(component_id) = self.registry.component_for_action(action_type) else {
            tracing::warn!("tracker: action {action_type} is not bound to a component, ignoring");
            return;
        };
        let record =
            InteractionRecord::new(component_id, action_type, Utc::now().timestamp_millis());
        if let Err(e) = self.log.save(&record) {
            tracing::warn!("tracker: failed to persist interaction: {e}");
        }
    }

    /// Predict the next action at the given time. Infallible: with no
    /// usable evidence the empty prediction comes back.
    pub fn predict(&self, timestamp_ms: i64) -> Prediction {
        self.model.predict(timestamp_ms)
    }

    /// Upload the current anonymized histogram immediately instead of
    /// waiting for the midnight schedule.
    pub fn force_upload_data(&self) {
        let Some(sync) = &self.sync else {
            tracing::warn!("sync: no server configured, nothing to upload");
            return;
        };
        match sync.upload(&self.model.history_snapshot()) {
            Ok(0) => tracing::debug!("sync: nothing to upload"),
            Ok(n) => tracing::info!("sync: force-uploaded {n} anonymized action counts"),
            Err(e) => tracing::warn!("sync: forced upload failed: {e}"),
        }
    }

    /// Stop the background schedule. Also happens on drop.
    pub fn shutdown(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    pub fn model(&self) -> &Arc<PredictionModel> {
        &self.model
    }

    pub fn interaction_log(&self) -> &Arc<InteractionLog> {
        &self.log
    }

    pub fn preload_cache(&self) -> &Arc<PreloadCache> {
        &self.preload
    }
}

/// Key resolution: explicit config first, then the `ENCRYPTION_KEY`
/// environment variable. Absence is fatal; there is no unencrypted mode.
fn resolve_key(config: &PreflightConfig) -> PreflightResult<String> {
    if let Some(key) = &config.encryption_key_hex {
        return Ok(key.clone());
    }
    std::env::var("ENCRYPTION_KEY").map_err(|_| ConfigError::MissingKey.into())
}
