use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use preflight_core::config::PreflightConfig;
use preflight_core::errors::{PreflightResult, SyncError};
use preflight_core::models::{ComponentDescriptor, InteractionRecord};
use preflight_core::traits::AssetFetcher;
use preflight_prediction::PredictionModel;
use preflight_preload::PreloadCache;
use preflight_registry::ComponentRegistry;

// ── Counting fetcher ─────────────────────────────────────────────────────

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
    fail: bool,
}

impl AssetFetcher for CountingFetcher {
    fn fetch(&self, component: &ComponentDescriptor) -> PreflightResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SyncError::NetworkError {
                reason: format!("asset for {} unreachable", component.id),
            }
            .into());
        }
        Ok(())
    }
}

fn setup(fail: bool) -> (PreloadCache, Arc<ComponentRegistry>, Arc<CountingFetcher>) {
    let registry = Arc::new(ComponentRegistry::new());
    registry.track_component("c1", "page", None);
    let fetcher = Arc::new(CountingFetcher {
        calls: AtomicUsize::new(0),
        fail,
    });
    let cache = PreloadCache::new(registry.clone(), fetcher.clone());
    (cache, registry, fetcher)
}

#[test]
fn preload_fetches_exactly_once_per_session() {
    let (cache, _, fetcher) = setup(false);
    cache.preload("c1");
    cache.preload("c1");
    cache.preload("c1");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_cached("c1"));
    assert_eq!(cache.cached_count(), 1);
}

#[test]
fn failed_fetch_is_not_retried_and_not_fatal() {
    let (cache, _, fetcher) = setup(true);
    cache.preload("c1");
    cache.preload("c1");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_cached("c1"));
}

#[test]
fn unknown_component_is_skipped() {
    let (cache, _, fetcher) = setup(false);
    cache.preload("ghost");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert!(!cache.is_cached("ghost"));
}

#[test]
fn empty_prediction_is_a_noop() {
    let (cache, registry, fetcher) = setup(false);
    let model = PredictionModel::new(PreflightConfig::default(), registry);
    cache.preload_next_prediction(&model, 0);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(cache.cached_count(), 0);
}

#[test]
fn prediction_drives_a_preload() {
    let (cache, registry, fetcher) = setup(false);
    registry.associate_action("go-c1", "c1").unwrap();
    let model = PredictionModel::new(PreflightConfig::default(), registry);
    model.observe(&InteractionRecord::new("c1", "go-c1", 1));

    cache.preload_next_prediction(&model, 2);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_cached("c1"));
}
