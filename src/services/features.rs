//! Feature-based extraction of dynamic patterns.

use crate::models::{DynamicFeature, Pattern, Segment};
use std::collections::HashSet;

/// Turn every static segment whose value matches a feature into a dynamic one
///
/// Produces one candidate per distinct resulting key, with frequency 0, for
/// each pattern that had at least one segment replaced. The candidates pick
/// up frequency and samples when merged with the patterns they came from.
pub fn extract_by_features(patterns: &[Pattern], features: &[DynamicFeature]) -> Vec<Pattern> {
    if features.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for pattern in patterns {
        let mut replaced = false;
        let segments: Vec<Segment> = pattern
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Static(value) if features.iter().any(|feature| feature.matches(value)) => {
                    replaced = true;
                    Segment::new_dynamic()
                }
                other => other.clone(),
            })
            .collect();

        if replaced {
            let candidate = Pattern::new(segments, 0);
            if seen.insert(candidate.key()) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}
