//! Canonical set: origin → path length → patterns.

use super::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Patterns of one origin, bucketed by path length
pub type PatternGroup = BTreeMap<usize, Vec<Pattern>>;

/// The durable state held across batches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSet {
    origins: BTreeMap<String, PatternGroup>,
}

impl CanonicalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.origins.keys().map(String::as_str)
    }

    pub fn group(&self, origin: &str) -> Option<&PatternGroup> {
        self.origins.get(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternGroup)> {
        self.origins
            .iter()
            .map(|(origin, group)| (origin.as_str(), group))
    }

    /// Patterns of one (origin, length) bucket, empty if the bucket is unknown
    pub fn bucket(&self, origin: &str, length: usize) -> &[Pattern] {
        self.origins
            .get(origin)
            .and_then(|group| group.get(&length))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace one bucket, creating the origin entry as needed
    pub fn set_bucket(&mut self, origin: &str, length: usize, patterns: Vec<Pattern>) {
        self.origins
            .entry(origin.to_string())
            .or_default()
            .insert(length, patterns);
    }

    /// Add occurrences of a pattern to its bucket without any reconciliation
    pub fn push(&mut self, origin: &str, pattern: Pattern) {
        self.origins
            .entry(origin.to_string())
            .or_default()
            .entry(pattern.len())
            .or_default()
            .push(pattern);
    }

    /// Every pattern of every bucket
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.origins
            .values()
            .flat_map(|group| group.values())
            .flatten()
    }

    /// Summed frequency across every bucket
    pub fn total_frequency(&self) -> u64 {
        self.patterns().map(|pattern| pattern.frequency).sum()
    }

    /// Count of (static, dynamic) patterns
    pub fn pattern_counts(&self) -> (usize, usize) {
        self.patterns().fold((0, 0), |(statics, dynamics), pattern| {
            if pattern.is_dynamic() {
                (statics, dynamics + 1)
            } else {
                (statics + 1, dynamics)
            }
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
