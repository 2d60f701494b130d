use crate::models::InteractionRecord;

/// Handler for interaction lifecycle events.
///
/// The method has a no-op default implementation so handlers only
/// override what they care about. `Send + Sync` is required because the
/// dispatcher is shared across service threads.
pub trait InteractionEventHandler: Send + Sync {
    /// Called after an interaction has been durably committed, with the
    /// plaintext record. Never called for failed saves.
    fn on_interaction_saved(&self, _record: &InteractionRecord) {}
}
