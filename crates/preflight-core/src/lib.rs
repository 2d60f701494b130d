//! # preflight-core
//!
//! Foundation crate for the preflight predictive preloading library.
//! Defines all shared types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PreflightConfig;
pub use errors::{PreflightError, PreflightResult};
pub use models::{ComponentDescriptor, GlobalModel, InteractionRecord, Prediction};
