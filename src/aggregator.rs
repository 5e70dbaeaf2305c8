use std::collections::HashMap;

pub const UNTAGGED: &str = "Untagged";

/// Counts per key, iterated in the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.positions
            .get(key)
            .map(|&pos| self.counts[pos].1)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Tag and port/protocol tallies for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    tag_counts: FrequencyTable,
    port_protocol_counts: FrequencyTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one accepted flow. A missing tag is counted as "Untagged".
    pub fn observe(&mut self, tag: Option<&str>, dstport: &str, protocol: &str) {
        let combo = format!("{dstport},{protocol}");
        self.port_protocol_counts.increment(&combo);
        self.tag_counts.increment(tag.unwrap_or(UNTAGGED));
    }

    pub fn tag_counts(&self) -> &FrequencyTable {
        &self.tag_counts
    }

    pub fn port_protocol_counts(&self) -> &FrequencyTable {
        &self.port_protocol_counts
    }

    pub fn observed(&self) -> u64 {
        self.port_protocol_counts.total()
    }
}
