//! PredictionModel — update path, query path, replay, global-model seeding.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, TimeZone, Timelike};

use preflight_core::config::PreflightConfig;
use preflight_core::constants::{MAX_GLOBAL_ACTIONS, MAX_GLOBAL_COUNT, TIE_EPSILON};
use preflight_core::models::{GlobalModel, InteractionRecord, Prediction};
use preflight_registry::ComponentRegistry;

use crate::counts::CountTable;
use crate::history::UserHistory;
use crate::matrix::TransitionMatrix;
use crate::time_patterns::TimePatterns;

struct ModelState {
    history: UserHistory,
    transitions: TransitionMatrix,
    global_counts: CountTable,
    time_patterns: TimePatterns,
}

/// The per-user model. Updates arrive from the interaction log's save
/// notifications; queries may come from any thread. One lock covers the
/// whole state so a query never sees a half-applied update.
pub struct PredictionModel {
    config: PreflightConfig,
    registry: Arc<ComponentRegistry>,
    state: Mutex<ModelState>,
}

impl PredictionModel {
    pub fn new(config: PreflightConfig, registry: Arc<ComponentRegistry>) -> Self {
        let state = ModelState {
            history: UserHistory::new(config.history_length),
            transitions: TransitionMatrix::new(config.max_pattern_length),
            global_counts: CountTable::default(),
            time_patterns: TimePatterns::default(),
        };
        Self {
            config,
            registry,
            state: Mutex::new(state),
        }
    }

    /// Fold one interaction into the model. The transition update runs
    /// against the history *before* the new action is appended — the
    /// transition goes from the prior window to this action.
    pub fn observe(&self, record: &InteractionRecord) {
        let mut guard = self.lock();
        let state = &mut *guard;

        state
            .time_patterns
            .record(&record.action_type, hour_of(record.timestamp_ms));
        state.global_counts.increment(&record.action_type);
        state.transitions.observe(&state.history, &record.action_type);
        state.history.push(record.clone());
    }

    /// Rebuild the model from persisted records, oldest first.
    pub fn replay(&self, mut records: Vec<InteractionRecord>) -> usize {
        records.sort_by_key(|r| r.timestamp_ms);
        let n = records.len();
        for record in &records {
            self.observe(record);
        }
        if n > 0 {
            tracing::info!("prediction: replayed {n} stored interactions");
        }
        n
    }

    /// Predict the next action at `now_ms` and resolve it to a component.
    ///
    /// Deterministic: two calls with the same state and `now_ms` return
    /// the same answer.
    pub fn predict(&self, now_ms: i64) -> Prediction {
        let guard = self.lock();
        if guard.history.is_empty() && guard.global_counts.is_empty() {
            return Prediction::none();
        }

        let sequence = self.sequence_distribution(&guard, now_ms);

        // Blend with the hour-of-day distribution.
        let hour = hour_of(now_ms);
        let hour_total = guard.time_patterns.hour_total(hour);
        let mut scores: Vec<(String, f64)> = Vec::new();
        for (action, p) in sequence {
            accumulate(&mut scores, &action, self.config.weight_sequence * p);
        }
        if hour_total > 0 {
            let total = hour_total as f64;
            for (action, histogram) in guard.time_patterns.iter() {
                let count = histogram[hour];
                if count == 0 {
                    continue;
                }
                accumulate(
                    &mut scores,
                    action,
                    self.config.weight_time * (count as f64 / total),
                );
            }
        }

        let action = match argmax_stable(&scores) {
            Some(best) => Some(best.to_string()),
            None => guard.global_counts.argmax().map(str::to_string),
        };
        let Some(action) = action else {
            return Prediction::none();
        };

        let component_id = self.registry.component_for_action(&action);
        Prediction {
            action: Some(action),
            component_id,
        }
    }

    /// Install server-aggregated counters wholesale, bounded to
    /// `MAX_GLOBAL_ACTIONS` entries with counts clamped to
    /// `MAX_GLOBAL_COUNT`. The transition matrix is never seeded
    /// remotely.
    pub fn install_global_model(&self, model: &GlobalModel) {
        let mut counts = CountTable::default();
        for (action, count) in model.action_counts.iter().take(MAX_GLOBAL_ACTIONS) {
            counts.add(action, (*count).min(MAX_GLOBAL_COUNT));
        }
        let dropped_counts = model.action_counts.len().saturating_sub(MAX_GLOBAL_ACTIONS);

        let mut patterns = TimePatterns::default();
        for (action, histogram) in model.time_patterns.iter().take(MAX_GLOBAL_ACTIONS) {
            let mut clamped = *histogram;
            for slot in &mut clamped {
                *slot = (*slot).min(MAX_GLOBAL_COUNT);
            }
            patterns.install(action, clamped);
        }
        let dropped_patterns = model.time_patterns.len().saturating_sub(MAX_GLOBAL_ACTIONS);

        if dropped_counts > 0 || dropped_patterns > 0 {
            tracing::warn!(
                "prediction: global model truncated ({dropped_counts} counters, {dropped_patterns} time patterns dropped)"
            );
        }

        let mut guard = self.lock();
        guard.global_counts = counts;
        guard.time_patterns = patterns;
        tracing::info!(
            "prediction: installed global model with {} actions",
            guard.global_counts.len()
        );
    }

    /// Whether local evidence is too thin to predict from and the global
    /// model should seed it.
    pub fn needs_global_seed(&self) -> bool {
        let guard = self.lock();
        guard.history.len() < self.config.min_actions_threshold || guard.transitions.is_empty()
    }

    /// Shallow copy of the history for the anonymized uploader.
    pub fn history_snapshot(&self) -> Vec<InteractionRecord> {
        self.lock().history.snapshot()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    /// Total interactions folded into the counters this session.
    pub fn total_observed(&self) -> u64 {
        self.lock().global_counts.total()
    }

    pub fn pattern_count(&self) -> usize {
        self.lock().transitions.pattern_count()
    }

    /// Smoothed, time-decayed next-action distribution from the
    /// transition rows matching the current history tail, normalized to
    /// sum to 1 when any evidence exists.
    fn sequence_distribution(&self, state: &ModelState, now_ms: i64) -> Vec<(String, f64)> {
        let mut dist: Vec<(String, f64)> = Vec::new();
        let alpha = self.config.smoothing_factor;
        let upper = self.config.max_pattern_length.min(state.history.len());

        for window in 1..=upper {
            let pattern = state.history.pattern(window);
            let Some(row) = state.transitions.row(window, &pattern) else {
                continue;
            };
            let Some(anchor) = state.history.window_anchor(window) else {
                continue;
            };
            let total = row.total() as f64;
            let distinct = row.len() as f64;
            let age_ms = (now_ms - anchor.timestamp_ms).max(0) as f64;
            let decay = (-self.config.decay_lambda * age_ms).exp();

            for (action, count) in row.iter() {
                let smoothed = (count as f64 + alpha) / (total + alpha * distinct);
                accumulate(&mut dist, action, smoothed * decay);
            }
        }

        let sum: f64 = dist.iter().map(|(_, p)| *p).sum();
        if sum > 0.0 {
            for (_, p) in &mut dist {
                *p /= sum;
            }
        }
        dist
    }

    fn lock(&self) -> MutexGuard<'_, ModelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Add into an insertion-ordered distribution.
fn accumulate(dist: &mut Vec<(String, f64)>, action: &str, value: f64) {
    match dist.iter_mut().find(|(a, _)| a == action) {
        Some((_, p)) => *p += value,
        None => dist.push((action.to_string(), value)),
    }
}

/// First-insertion argmax: a later candidate replaces the best only when
/// it is better by more than the tie window.
fn argmax_stable(scores: &[(String, f64)]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (action, score) in scores {
        match best {
            None => best = Some((action, *score)),
            Some((_, b)) if *score > b + TIE_EPSILON => best = Some((action, *score)),
            _ => {}
        }
    }
    best.map(|(action, _)| action)
}

/// Local-time hour of a millisecond timestamp, matching the wall-clock
/// hours users actually live in.
fn hour_of(timestamp_ms: i64) -> usize {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.hour() as usize)
        .unwrap_or(0)
}
