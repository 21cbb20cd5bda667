//! Branching threshold, optionally paired with a frequency cutoff.

use super::pattern::Pattern;
use std::fmt;
use std::sync::Arc;

/// Threshold used when none is configured
pub const DEFAULT_BRANCHING_THRESHOLD: usize = 100;

type ThresholdGenerator = Arc<dyn Fn(&[Pattern]) -> ResolvedThreshold + Send + Sync>;

/// Concrete threshold values for one optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedThreshold {
    /// A node is generalized once its child count exceeds this value
    pub branching: usize,
    /// Only patterns at or below this frequency are optimized structurally
    pub frequency_cutoff: Option<u64>,
}

impl ResolvedThreshold {
    pub fn new(branching: usize) -> Self {
        Self {
            branching,
            frequency_cutoff: None,
        }
    }

    pub fn with_cutoff(branching: usize, frequency_cutoff: u64) -> Self {
        Self {
            branching,
            frequency_cutoff: Some(frequency_cutoff),
        }
    }
}

/// Threshold supplied by the caller
#[derive(Clone)]
pub enum Threshold {
    Fixed(usize),
    WithFrequencyCutoff {
        branching: usize,
        frequency_cutoff: u64,
    },
    /// Computed from the merged raw patterns of the bucket being optimized
    Generated(ThresholdGenerator),
}

impl Threshold {
    pub fn generated<F>(generator: F) -> Self
    where
        F: Fn(&[Pattern]) -> ResolvedThreshold + Send + Sync + 'static,
    {
        Threshold::Generated(Arc::new(generator))
    }

    /// Resolve against a bucket's patterns
    ///
    /// The branching value is clamped to at least 1: at 0 a lone dynamic child
    /// would exceed the threshold and be collapsed again forever.
    pub fn resolve(&self, patterns: &[Pattern]) -> ResolvedThreshold {
        let resolved = match self {
            Threshold::Fixed(branching) => ResolvedThreshold::new(*branching),
            Threshold::WithFrequencyCutoff {
                branching,
                frequency_cutoff,
            } => ResolvedThreshold::with_cutoff(*branching, *frequency_cutoff),
            Threshold::Generated(generator) => generator(patterns),
        };
        ResolvedThreshold {
            branching: resolved.branching.max(1),
            ..resolved
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Fixed(DEFAULT_BRANCHING_THRESHOLD)
    }
}

impl From<usize> for Threshold {
    fn from(branching: usize) -> Self {
        Threshold::Fixed(branching)
    }
}

impl From<(usize, u64)> for Threshold {
    fn from((branching, frequency_cutoff): (usize, u64)) -> Self {
        Threshold::WithFrequencyCutoff {
            branching,
            frequency_cutoff,
        }
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Fixed(branching) => f.debug_tuple("Fixed").field(branching).finish(),
            Threshold::WithFrequencyCutoff {
                branching,
                frequency_cutoff,
            } => f
                .debug_struct("WithFrequencyCutoff")
                .field("branching", branching)
                .field("frequency_cutoff", frequency_cutoff)
                .finish(),
            Threshold::Generated(_) => f.write_str("Generated(..)"),
        }
    }
}
