//! Session-scoped preload cache.

use std::sync::Arc;

use dashmap::DashMap;

use preflight_core::traits::AssetFetcher;
use preflight_prediction::PredictionModel;
use preflight_registry::ComponentRegistry;

/// Idempotent preload dispatcher. The cache key is the component id; a
/// component stays marked even when its fetch failed, holding the
/// at-most-one-fetch-per-session contract.
pub struct PreloadCache {
    registry: Arc<ComponentRegistry>,
    fetcher: Arc<dyn AssetFetcher>,
    cached: DashMap<String, ()>,
}

impl PreloadCache {
    pub fn new(registry: Arc<ComponentRegistry>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            registry,
            fetcher,
            cached: DashMap::new(),
        }
    }

    /// Fetch a component's asset unless this session already did.
    /// Unknown components and fetch failures are logged, never fatal.
    pub fn preload(&self, component_id: &str) {
        let Some(descriptor) = self.registry.get(component_id) else {
            tracing::warn!("preload: component {component_id} is not tracked, skipping");
            return;
        };
        if self.cached.insert(component_id.to_string(), ()).is_some() {
            tracing::debug!("preload: {component_id} already cached this session");
            return;
        }
        match self.fetcher.fetch(&descriptor) {
            Ok(()) => tracing::debug!("preload: fetched {component_id}"),
            Err(e) => tracing::warn!("preload: fetch for {component_id} failed: {e}"),
        }
    }

    /// Predict at `now_ms` and preload the result. A prediction without a
    /// component is a no-op.
    pub fn preload_next_prediction(&self, model: &PredictionModel, now_ms: i64) {
        let prediction = model.predict(now_ms);
        match prediction.component_id {
            Some(component_id) => self.preload(&component_id),
            None => tracing::debug!("preload: nothing to preload"),
        }
    }

    pub fn is_cached(&self, component_id: &str) -> bool {
        self.cached.contains_key(component_id)
    }

    pub fn cached_count(&self) -> usize {
        self.cached.len()
    }
}
