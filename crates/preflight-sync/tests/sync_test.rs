use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use preflight_core::errors::PreflightResult;
use preflight_core::models::InteractionRecord;
use preflight_core::traits::KeyValueStore;
use preflight_crypto::CryptoService;
use preflight_sync::protocol::{AnonymizedCount, GlobalModelResponse, UploadRequest};
use preflight_sync::{HttpClientConfig, SyncEngine, UploadScheduler};

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

const KEY_HEX: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

fn engine() -> (Arc<SyncEngine>, Arc<MemoryKv>) {
    let kv = Arc::new(MemoryKv::default());
    let crypto = Arc::new(CryptoService::from_hex_key(KEY_HEX, kv.clone()).unwrap());
    let engine = Arc::new(SyncEngine::new(
        HttpClientConfig::default(),
        crypto,
        kv.clone(),
    ));
    (engine, kv)
}

// ── Registration ─────────────────────────────────────────────────────────

#[test]
fn register_prefers_the_persisted_app_id() {
    let (engine, kv) = engine();
    kv.put("prediction_model_app_id", "app-42").unwrap();
    assert_eq!(engine.register(), "app-42");
    assert_eq!(engine.app_id().as_deref(), Some("app-42"));
}

#[test]
fn register_falls_back_when_the_server_is_unreachable() {
    // The transport is disabled in this build, so registration degrades
    // the same way a network failure would.
    let (engine, kv) = engine();
    let app_id = engine.register();
    assert!(app_id.starts_with("fallback-"), "got {app_id}");
    // Fallback ids are session-local, never persisted.
    assert!(kv.get("prediction_model_app_id").unwrap().is_none());
}

// ── Upload preconditions ─────────────────────────────────────────────────

#[test]
fn upload_is_a_noop_without_history() {
    let (engine, _) = engine();
    engine.register();
    assert_eq!(engine.upload(&[]).unwrap(), 0);
}

#[test]
fn upload_is_a_noop_without_an_app_id() {
    let (engine, _) = engine();
    let history = vec![InteractionRecord::new("c1", "go", 1)];
    assert_eq!(engine.upload(&history).unwrap(), 0);
}

#[test]
fn upload_with_history_and_app_id_requires_the_network() {
    let (engine, kv) = engine();
    kv.put("prediction_model_app_id", "app-1").unwrap();
    engine.register();
    let history = vec![
        InteractionRecord::new("c1", "go", 1),
        InteractionRecord::new("c1", "go", 2),
    ];
    // With the transport disabled the upload reaches the wire and fails
    // there; local state is untouched.
    assert!(engine.upload(&history).is_err());
}

// ── Wire shapes ──────────────────────────────────────────────────────────

#[test]
fn upload_request_serializes_the_server_contract() {
    let request = UploadRequest {
        app_id: "app-1".into(),
        interactions: vec![AnonymizedCount {
            action_type: "Y2lwaGVy".into(),
            action_type_iv: "aXY=".into(),
            count: 3,
        }],
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["appId"], "app-1");
    assert_eq!(json["interactions"][0]["actionType"], "Y2lwaGVy");
    assert_eq!(json["interactions"][0]["actionTypeIV"], "aXY=");
    assert_eq!(json["interactions"][0]["count"], 3);
}

#[test]
fn global_model_response_parses_the_server_contract() {
    let raw = r#"{
        "globalActionCounter": {"abc": 7},
        "globalActionCounterIVs": {"abc": "aXYx"},
        "timePatterns": {"abc": {"14": 5, "3": 2}},
        "timePatternsIVs": {"abc": "aXYx"}
    }"#;
    let response: GlobalModelResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(response.global_action_counter["abc"], 7);
    assert_eq!(response.global_action_counter_ivs["abc"], "aXYx");
    assert_eq!(response.time_patterns["abc"][&14], 5);
    assert_eq!(response.time_patterns["abc"][&3], 2);
}

#[test]
fn global_model_response_tolerates_missing_sections() {
    let response: GlobalModelResponse = serde_json::from_str("{}").unwrap();
    assert!(response.global_action_counter.is_empty());
    assert!(response.time_patterns.is_empty());
}

// ── Scheduler teardown ───────────────────────────────────────────────────

#[test]
fn scheduler_stops_promptly_before_its_first_tick() {
    let (engine, _) = engine();
    let started = Instant::now();
    let mut scheduler = UploadScheduler::start(engine, Vec::new);
    scheduler.stop();
    assert!(started.elapsed() < Duration::from_secs(5));
}
