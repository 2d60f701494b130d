//! Variable-order transition counts.

use std::collections::HashMap;

use crate::counts::CountTable;
use crate::history::UserHistory;

/// For each context length `L` in `1..=max_len`, maps the comma-joined
/// pattern of the `L` actions preceding an observation to the counts of
/// the actions that followed it.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    max_len: usize,
    lengths: HashMap<usize, HashMap<String, CountTable>>,
}

impl TransitionMatrix {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            lengths: HashMap::new(),
        }
    }

    /// Count `action` as the successor of every window of the current
    /// history. Must be called *before* the action is appended: the
    /// transition goes from the prior window to the new action.
    pub fn observe(&mut self, history: &UserHistory, action: &str) {
        let upper = self.max_len.min(history.len());
        for window in 1..=upper {
            let pattern = history.pattern(window);
            self.lengths
                .entry(window)
                .or_default()
                .entry(pattern)
                .or_default()
                .increment(action);
        }
    }

    pub fn row(&self, window: usize, pattern: &str) -> Option<&CountTable> {
        self.lengths.get(&window)?.get(pattern)
    }

    /// Total number of distinct (length, pattern) rows.
    pub fn pattern_count(&self) -> usize {
        self.lengths.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}
