//! Shared data model.

mod component;
mod global_model;
mod interaction;
mod prediction;

pub use component::ComponentDescriptor;
pub use global_model::GlobalModel;
pub use interaction::{EncryptedInteraction, InteractionRecord};
pub use prediction::Prediction;
