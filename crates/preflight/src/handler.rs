//! The save-bus handler that keeps the model and the preload cache warm.

use std::sync::Arc;

use chrono::Utc;

use preflight_core::events::InteractionEventHandler;
use preflight_core::models::InteractionRecord;
use preflight_prediction::PredictionModel;
use preflight_preload::PreloadCache;

/// Folds each committed interaction into the model, then preloads
/// whatever the updated model now expects next.
pub(crate) struct ModelUpdateHandler {
    model: Arc<PredictionModel>,
    preload: Arc<PreloadCache>,
}

impl ModelUpdateHandler {
    pub(crate) fn new(model: Arc<PredictionModel>, preload: Arc<PreloadCache>) -> Self {
        Self { model, preload }
    }
}

impl InteractionEventHandler for ModelUpdateHandler {
    fn on_interaction_saved(&self, record: &InteractionRecord) {
        self.model.observe(record);
        self.preload
            .preload_next_prediction(&self.model, Utc::now().timestamp_millis());
    }
}
