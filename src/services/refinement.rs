//! Fixed-point refinement of dynamic patterns against their own samples.

use super::optimizer::ConvergenceOptimizer;
use super::tree::PathTree;
use crate::error::Result;
use crate::models::Pattern;
use std::collections::HashSet;
use tracing::debug;

/// Tighten dynamic patterns until re-optimizing their samples reproduces them
///
/// Each candidate is checked against the static patterns it matches in `raw`.
/// Candidates without samples are dropped. When a fresh optimization of the
/// samples yields exactly the candidate back, it is stable; otherwise the
/// produced patterns replace it and are refined in turn. A key that was
/// already replaced once is not expanded again.
pub fn refine_dynamic_patterns(
    candidates: Vec<Pattern>,
    raw: &[&Pattern],
    optimizer: &ConvergenceOptimizer,
) -> Result<Vec<Pattern>> {
    let mut stable: Vec<Pattern> = Vec::new();
    let mut expanded: HashSet<String> = HashSet::new();
    let mut stack = candidates;

    while let Some(pattern) = stack.pop() {
        let key = pattern.key();
        if expanded.contains(&key) {
            continue;
        }

        let samples = pattern.sample(raw.iter().copied());
        if samples.is_empty() {
            debug!(pattern = %pattern, "Dropping dynamic pattern without samples");
            continue;
        }

        let mut tree = PathTree::build(samples);
        optimizer.optimize(&mut tree)?;
        let refined = tree.dynamic_patterns();

        if refined.len() == 1 && refined[0] == pattern {
            if !stable.contains(&pattern) {
                stable.push(pattern);
            }
        } else {
            debug!(
                pattern = %pattern,
                replacements = refined.len(),
                "Refining dynamic pattern"
            );
            expanded.insert(key);
            stack.extend(refined);
        }
    }

    Ok(stable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(paths: &[&str]) -> Vec<Pattern> {
        paths.iter().map(|path| Pattern::parse(path, 1)).collect()
    }

    fn refine(candidates: &[&str], paths: &[&str], threshold: usize) -> Vec<String> {
        let raw = raw(paths);
        let refs: Vec<&Pattern> = raw.iter().collect();
        let candidates = candidates.iter().map(|path| Pattern::parse(path, 0)).collect();
        refine_dynamic_patterns(candidates, &refs, &ConvergenceOptimizer::new(threshold))
            .unwrap()
            .iter()
            .map(Pattern::to_string)
            .collect()
    }

    #[test]
    fn test_stable_pattern_is_kept() {
        let result = refine(
            &["/users/:param"],
            &["/users/1", "/users/2", "/users/3", "/users/4"],
            3,
        );
        assert_eq!(result, vec!["/users/:param"]);
    }

    #[test]
    fn test_pattern_without_samples_is_dropped() {
        let result = refine(&["/teams/:param"], &["/users/1", "/users/2"], 1);
        assert!(result.is_empty());
    }

    #[test]
    fn test_over_general_pattern_is_tightened() {
        // The samples only vary in the last position
        let result = refine(
            &["/:param/:param"],
            &["/users/1", "/users/2", "/users/3", "/users/4"],
            3,
        );
        assert_eq!(result, vec!["/users/:param"]);
    }

    #[test]
    fn test_pattern_with_too_few_samples_dissolves() {
        let result = refine(&["/users/:param"], &["/users/1", "/users/2"], 3);
        assert!(result.is_empty());
    }

    #[test]
    fn test_dynamic_raw_patterns_are_not_samples() {
        let result = refine(
            &["/users/:param"],
            &["/users/:param", "/users/1", "/users/2"],
            1,
        );
        assert_eq!(result, vec!["/users/:param"]);
    }
}
