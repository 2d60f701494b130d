use std::sync::Arc;

use proptest::prelude::*;

use preflight_core::config::PreflightConfig;
use preflight_core::models::InteractionRecord;
use preflight_prediction::PredictionModel;
use preflight_registry::ComponentRegistry;

const ACTIONS: [&str; 4] = ["open", "close", "search", "checkout"];

fn model_with_history_cap(cap: usize) -> PredictionModel {
    let config = PreflightConfig {
        history_length: cap,
        ..Default::default()
    };
    PredictionModel::new(config, Arc::new(ComponentRegistry::new()))
}

// ── History bound and counter totals ─────────────────────────────────────

proptest! {
    #[test]
    fn history_never_exceeds_its_bound(
        indices in prop::collection::vec(0usize..ACTIONS.len(), 0..200),
        cap in 1usize..20,
    ) {
        let model = model_with_history_cap(cap);
        for (i, idx) in indices.iter().enumerate() {
            model.observe(&InteractionRecord::new("c", ACTIONS[*idx], i as i64));
            prop_assert!(model.history_len() <= cap);
        }
        prop_assert_eq!(model.history_len(), indices.len().min(cap));
    }

    #[test]
    fn counter_total_equals_observation_count(
        indices in prop::collection::vec(0usize..ACTIONS.len(), 0..200),
    ) {
        let model = model_with_history_cap(100);
        for (i, idx) in indices.iter().enumerate() {
            model.observe(&InteractionRecord::new("c", ACTIONS[*idx], i as i64));
        }
        prop_assert_eq!(model.total_observed(), indices.len() as u64);
    }
}

// ── Prediction purity ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn predict_is_a_pure_function_of_state_and_time(
        indices in prop::collection::vec(0usize..ACTIONS.len(), 0..50),
        now in 0i64..10_000_000,
    ) {
        let model = model_with_history_cap(100);
        for (i, idx) in indices.iter().enumerate() {
            model.observe(&InteractionRecord::new("c", ACTIONS[*idx], i as i64));
        }
        let first = model.predict(now);
        prop_assert_eq!(model.predict(now), first.clone());
        // Querying must not mutate the model.
        prop_assert_eq!(model.predict(now), first);
    }
}
