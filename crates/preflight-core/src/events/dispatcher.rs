use std::sync::{Arc, Mutex, PoisonError};

use crate::models::InteractionRecord;

use super::InteractionEventHandler;

/// Synchronous fan-out to registered handlers, in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Mutex<Vec<Arc<dyn InteractionEventHandler>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Handlers are invoked in the order they were
    /// registered.
    pub fn register(&self, handler: Arc<dyn InteractionEventHandler>) {
        self.lock().push(handler);
    }

    /// Notify every handler of a committed save. Handlers run outside the
    /// registration lock so they may themselves subscribe.
    pub fn dispatch_saved(&self, record: &InteractionRecord) {
        let handlers: Vec<_> = self.lock().clone();
        for handler in handlers {
            handler.on_interaction_saved(record);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn InteractionEventHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
