//! Bounded interaction history, newest at the tail.

use std::collections::VecDeque;

use preflight_core::models::InteractionRecord;

#[derive(Debug, Clone)]
pub struct UserHistory {
    items: VecDeque<InteractionRecord>,
    capacity: usize,
}

impl UserHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append, dropping from the head to hold the capacity bound.
    pub fn push(&mut self, record: InteractionRecord) {
        self.items.push_back(record);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Comma-joined action types of the last `window` items. Callers must
    /// keep `window <= len`.
    pub fn pattern(&self, window: usize) -> String {
        let start = self.items.len().saturating_sub(window);
        let mut out = String::new();
        for (i, record) in self.items.iter().skip(start).enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&record.action_type);
        }
        out
    }

    /// The oldest record inside a window of the given length, i.e. the
    /// record whose timestamp anchors the window's age.
    pub fn window_anchor(&self, window: usize) -> Option<&InteractionRecord> {
        self.items.len().checked_sub(window).and_then(|i| self.items.get(i))
    }

    /// Shallow copy for the uploader; taken in one go so concurrent
    /// updates cannot shear the sequence.
    pub fn snapshot(&self) -> Vec<InteractionRecord> {
        self.items.iter().cloned().collect()
    }
}
