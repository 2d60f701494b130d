//! Insertion-ordered action counter.

/// A counter that remembers the order in which keys first appeared.
/// That order is the stable tie-break for every argmax in the model, so
/// it must never be disturbed by later increments.
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    entries: Vec<(String, u64)>,
}

impl CountTable {
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, n: u64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += n,
            None => self.entries.push((key.to_string(), n)),
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Key with the highest count; on equal counts the earlier insertion
    /// wins.
    pub fn argmax(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (key, count) in self.iter() {
            match best {
                Some((_, b)) if count <= b => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(k, _)| k)
    }
}
