//! Per-action hour-of-day histograms.

pub const HOURS: usize = 24;

/// Insertion-ordered `action -> [count; 24]`. Order matters for the same
/// reason as in `CountTable`: it is the stable tie-break.
#[derive(Debug, Clone, Default)]
pub struct TimePatterns {
    entries: Vec<(String, [u64; HOURS])>,
}

impl TimePatterns {
    pub fn record(&mut self, action: &str, hour: usize) {
        let hour = hour.min(HOURS - 1);
        if let Some((_, histogram)) = self.entries.iter_mut().find(|(a, _)| a == action) {
            histogram[hour] += 1;
            return;
        }
        let mut histogram = [0; HOURS];
        histogram[hour] = 1;
        self.entries.push((action.to_string(), histogram));
    }

    /// Install a histogram wholesale (global-model seeding).
    pub fn install(&mut self, action: &str, histogram: [u64; HOURS]) {
        match self.entries.iter_mut().find(|(a, _)| a == action) {
            Some((_, h)) => *h = histogram,
            None => self.entries.push((action.to_string(), histogram)),
        }
    }

    /// Total observations across all actions at the given hour.
    pub fn hour_total(&self, hour: usize) -> u64 {
        self.entries
            .iter()
            .map(|(_, h)| h[hour.min(HOURS - 1)])
            .sum()
    }

    pub fn get(&self, action: &str) -> Option<&[u64; HOURS]> {
        self.entries.iter().find(|(a, _)| a == action).map(|(_, h)| h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64; HOURS])> {
        self.entries.iter().map(|(a, h)| (a.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
