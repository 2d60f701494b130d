use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A server-aggregated model after decryption: plaintext action names
/// mapped to counts and per-hour histograms. Ordered maps keep the
/// install order reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalModel {
    pub action_counts: BTreeMap<String, u64>,
    pub time_patterns: BTreeMap<String, [u64; 24]>,
}

impl GlobalModel {
    pub fn is_empty(&self) -> bool {
        self.action_counts.is_empty() && self.time_patterns.is_empty()
    }
}
