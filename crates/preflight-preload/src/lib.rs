//! # preflight-preload
//!
//! Turns predictions into at-most-once fetches. The application supplies
//! the [`AssetFetcher`](preflight_core::traits::AssetFetcher); this crate
//! guarantees that a component is fetched at most once per session no
//! matter how often it is predicted, and that fetch failures never
//! propagate past a warning.

mod cache;

pub use cache::PreloadCache;
