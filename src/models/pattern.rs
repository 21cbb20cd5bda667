//! Path pattern model: a positional sequence of segments with its frequency
//! and the concrete samples it generalizes.

use super::segment::Segment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A path shape such as `/users/:param`
///
/// Equality and hashing look at the segments only; frequency and samples are
/// bookkeeping that merges accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    segments: Vec<Segment>,
    /// Number of raw occurrences this pattern accounts for
    pub frequency: u64,
    /// Concrete static patterns folded into this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<Pattern>,
}

impl Pattern {
    pub fn new(segments: Vec<Segment>, frequency: u64) -> Self {
        Self {
            segments,
            frequency,
            samples: Vec::new(),
        }
    }

    /// Build a fully static pattern from path components
    pub fn from_components<I, S>(components: I, frequency: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = components.into_iter().map(Segment::new_static).collect();
        Self::new(segments, frequency)
    }

    /// Parse a rendered pattern like `/users/:param` back into segments
    pub fn parse(path: &str, frequency: u64) -> Self {
        let segments = path
            .split('/')
            .filter(|component| !component.is_empty())
            .map(|component| {
                if component == super::segment::DYNAMIC_PLACEHOLDER {
                    Segment::new_dynamic()
                } else {
                    Segment::new_static(component)
                }
            })
            .collect();
        Self::new(segments, frequency)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Identity key, the concatenation of segment keys
    pub fn key(&self) -> String {
        self.segments
            .iter()
            .map(Segment::key)
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn is_dynamic(&self) -> bool {
        self.segments.iter().any(Segment::is_dynamic)
    }

    /// Same length and identical segments at every position
    pub fn equals(&self, other: &Pattern) -> bool {
        self.segments == other.segments
    }

    /// Whether the two patterns could describe the same concrete path
    pub fn matches(&self, other: &Pattern) -> bool {
        self.len() == other.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Static(left), Segment::Static(right)) => left == right,
                    _ => true,
                })
    }

    /// Whether `self` is at least as general as `other` at every position
    pub fn contains(&self, other: &Pattern) -> bool {
        self.len() == other.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.is_dynamic() || a == b)
    }

    /// The fully static patterns among `patterns` that this pattern represents
    pub fn sample<'a, I>(&self, patterns: I) -> Vec<&'a Pattern>
    where
        I: IntoIterator<Item = &'a Pattern>,
    {
        patterns
            .into_iter()
            .filter(|candidate| !candidate.is_dynamic() && self.matches(candidate))
            .collect()
    }

    /// Fold `other` into this pattern: frequencies add up, samples are appended
    pub fn absorb(&mut self, other: Pattern) {
        self.frequency += other.frequency;
        if other.is_dynamic() {
            self.samples.extend(other.samples);
        } else {
            self.samples.push(other);
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
