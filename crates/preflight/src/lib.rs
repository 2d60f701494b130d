//! # preflight
//!
//! Client-side predictive preloading. Applications register the
//! components a user can navigate to and report interactions as they
//! happen; preflight learns per-user sequential and time-of-day patterns,
//! predicts the next likely action, and preloads the matching component
//! before the user asks for it.
//!
//! | Service | Job |
//! |---------|-----|
//! | [`ComponentRegistry`] | component descriptors + action bindings |
//! | [`InteractionLog`] | encrypted durable log, save notifications |
//! | [`PredictionModel`] | variable-order transitions + hour histograms |
//! | [`PreloadCache`] | at-most-once fetch per predicted component |
//! | [`SyncEngine`] | anonymized upload + global-model bootstrap |
//!
//! ```no_run
//! use preflight::{Preflight, PreflightConfig};
//!
//! let config = PreflightConfig {
//!     encryption_key_hex: Some("0".repeat(64)),
//!     ..Default::default()
//! };
//! let app = Preflight::init(config)?;
//!
//! app.track_component("checkout-page", "page", None);
//! app.associate_action_with_component("click-checkout", "checkout-page")?;
//!
//! app.track_interaction("click-checkout");
//! let next = app.predict(chrono::Utc::now().timestamp_millis());
//! println!("likely next: {:?}", next.action);
//! # Ok::<(), preflight::PreflightError>(())
//! ```
//!
//! Predictions are best-effort hints: `track_interaction` and `predict`
//! never fail for operational reasons, and remote sync degrades to
//! local-only operation on any network trouble.

mod client;
mod handler;

pub use client::Preflight;

pub use preflight_core::config::PreflightConfig;
pub use preflight_core::errors::{PreflightError, PreflightResult};
pub use preflight_core::models::{ComponentDescriptor, InteractionRecord, Prediction};
pub use preflight_core::traits::{AssetFetcher, NoopFetcher};
pub use preflight_prediction::PredictionModel;
pub use preflight_preload::PreloadCache;
pub use preflight_registry::ComponentRegistry;
pub use preflight_store::InteractionLog;
pub use preflight_sync::SyncEngine;
