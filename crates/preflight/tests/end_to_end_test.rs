use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;

use preflight::{AssetFetcher, Preflight, PreflightConfig, PreflightError};
use preflight_core::errors::PreflightResult;
use preflight_core::models::ComponentDescriptor;

const KEY_HEX: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

fn config_in_memory() -> PreflightConfig {
    PreflightConfig {
        database_path: ":memory:".into(),
        encryption_key_hex: Some(KEY_HEX.into()),
        ..Default::default()
    }
}

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

impl AssetFetcher for CountingFetcher {
    fn fetch(&self, _component: &ComponentDescriptor) -> PreflightResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Startup ──────────────────────────────────────────────────────────────

#[test]
fn init_fails_without_an_encryption_key() {
    std::env::remove_var("ENCRYPTION_KEY");
    let config = PreflightConfig {
        database_path: ":memory:".into(),
        ..Default::default()
    };
    let err = Preflight::init(config).unwrap_err();
    assert!(matches!(err, PreflightError::Config(_)), "got {err:?}");
}

#[test]
fn init_rejects_negative_weights() {
    let config = PreflightConfig {
        weight_time: -0.5,
        ..config_in_memory()
    };
    let err = Preflight::init(config).unwrap_err();
    assert!(matches!(err, PreflightError::Config(_)), "got {err:?}");
}

// ── The full loop ────────────────────────────────────────────────────────

#[test]
fn tracked_interactions_drive_prediction_and_preload() {
    let fetcher = Arc::new(CountingFetcher::default());
    let app = Preflight::init_with_fetcher(config_in_memory(), fetcher.clone()).unwrap();

    app.track_component("c1", "page", None);
    app.associate_action_with_component("go-c1", "c1").unwrap();

    app.track_interaction("go-c1");

    // The save bus updated the model and preloaded the follow-up
    // prediction, which with one observation is c1 itself.
    assert_eq!(app.model().total_observed(), 1);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(app.preload_cache().is_cached("c1"));

    let prediction = app.predict(Utc::now().timestamp_millis());
    assert_eq!(prediction.action.as_deref(), Some("go-c1"));
    assert_eq!(prediction.component_id.as_deref(), Some("c1"));
}

#[test]
fn alternating_actions_predict_the_follower() {
    let app = Preflight::init(config_in_memory()).unwrap();
    app.track_component("comp-a", "page", None);
    app.track_component("comp-b", "page", None);
    app.associate_action_with_component("A", "comp-a").unwrap();
    app.associate_action_with_component("B", "comp-b").unwrap();

    for action in ["A", "B", "A", "B", "A"] {
        app.track_interaction(action);
    }

    let prediction = app.predict(Utc::now().timestamp_millis());
    assert_eq!(prediction.action.as_deref(), Some("B"));
    assert_eq!(prediction.component_id.as_deref(), Some("comp-b"));
}

#[test]
fn unbound_actions_are_ignored_with_a_warning() {
    let app = Preflight::init(config_in_memory()).unwrap();
    app.track_interaction("never-bound");
    assert_eq!(app.model().total_observed(), 0);
    assert_eq!(app.interaction_log().count().unwrap(), 0);
}

#[test]
fn duplicate_component_registration_is_a_noop() {
    let app = Preflight::init(config_in_memory()).unwrap();
    app.track_component("c1", "page", None);
    app.track_component("c1", "widget", None);
    assert_eq!(app.registry().len(), 1);
    assert_eq!(app.registry().get("c1").unwrap().kind, "page");
}

// ── Durability and replay ────────────────────────────────────────────────

#[test]
fn model_is_rebuilt_from_the_store_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preflight.db");
    let config = PreflightConfig {
        database_path: path.to_string_lossy().into_owned(),
        encryption_key_hex: Some(KEY_HEX.into()),
        ..Default::default()
    };

    {
        let app = Preflight::init(config.clone()).unwrap();
        app.track_component("c1", "page", None);
        app.associate_action_with_component("go-c1", "c1").unwrap();
        for _ in 0..3 {
            app.track_interaction("go-c1");
        }
        assert_eq!(app.model().total_observed(), 3);
    }

    // A fresh instance over the same database replays the decrypted log.
    let app = Preflight::init(config).unwrap();
    assert_eq!(app.model().total_observed(), 3);
    assert_eq!(app.model().history_len(), 3);

    // Bindings are in-memory only, so the replayed model predicts the
    // action but cannot resolve a component until it is rebound.
    let prediction = app.predict(Utc::now().timestamp_millis());
    assert_eq!(prediction.action.as_deref(), Some("go-c1"));
    assert!(prediction.component_id.is_none());

    app.track_component("c1", "page", None);
    app.associate_action_with_component("go-c1", "c1").unwrap();
    let rebound = app.predict(Utc::now().timestamp_millis());
    assert_eq!(rebound.component_id.as_deref(), Some("c1"));
}

// ── Remote degradation ───────────────────────────────────────────────────

#[test]
fn unreachable_server_never_breaks_local_operation() {
    let config = PreflightConfig {
        server_url: Some("http://127.0.0.1:9".into()),
        ..config_in_memory()
    };
    let mut app = Preflight::init(config).unwrap();
    app.track_component("c1", "page", None);
    app.associate_action_with_component("go-c1", "c1").unwrap();
    app.track_interaction("go-c1");

    // Forced upload fails on the wire but must not disturb anything.
    app.force_upload_data();
    assert_eq!(app.model().total_observed(), 1);

    app.shutdown();
}

#[test]
fn force_upload_without_a_server_is_a_noop() {
    let app = Preflight::init(config_in_memory()).unwrap();
    app.force_upload_data();
}
