//! # preflight-prediction
//!
//! Next-action prediction from two fused evidence sources:
//!
//! | Source | Signal |
//! |--------|--------|
//! | Sequence | variable-order transition counts over the recent history window |
//! | Time-of-day | per-action hour histograms |
//!
//! Sequence evidence is Laplace-smoothed and exponentially time-decayed,
//! then blended with the hour distribution under configurable weights.
//! Ties inside a `1e-6` window resolve to the earliest-inserted candidate,
//! so prediction is a pure function of model state and the query time.

mod counts;
mod engine;
mod history;
mod matrix;
mod time_patterns;

pub use counts::CountTable;
pub use engine::PredictionModel;
pub use history::UserHistory;
pub use matrix::TransitionMatrix;
pub use time_patterns::TimePatterns;
