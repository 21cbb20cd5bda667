//! Optimization of one (origin, length) bucket.

use super::features::extract_by_features;
use super::merger::merge_patterns;
use super::optimizer::{ConvergenceOptimizer, OptimizeStats};
use super::refinement::refine_dynamic_patterns;
use super::tree::PathTree;
use crate::error::Result;
use crate::models::{DynamicFeature, Pattern, Threshold};
use tracing::debug;

/// Produce the new canonical patterns of a bucket
///
/// `prior` is the bucket's current canonical list and `raw` the newly
/// observed patterns. Both are merged, structurally optimized, refined and
/// merged again; finally the feature pass generalizes literals the structure
/// could not, and the result is merged once more.
///
/// With a frequency cutoff only patterns at or below it, plus every dynamic
/// pattern, take part in structural optimization. The others are carried
/// through to the final merges untouched.
pub fn optimize_patterns(
    prior: Vec<Pattern>,
    raw: Vec<Pattern>,
    threshold: &Threshold,
    features: &[DynamicFeature],
) -> Result<Vec<Pattern>> {
    let (optimal, _) = optimize_patterns_with_stats(prior, raw, threshold, features)?;
    Ok(optimal)
}

/// Same as [`optimize_patterns`], also reporting what the optimizer changed
pub fn optimize_patterns_with_stats(
    prior: Vec<Pattern>,
    raw: Vec<Pattern>,
    threshold: &Threshold,
    features: &[DynamicFeature],
) -> Result<(Vec<Pattern>, OptimizeStats)> {
    let merged = merge_patterns(prior.into_iter().chain(raw));
    let resolved = threshold.resolve(&merged);

    let candidates: Vec<&Pattern> = match resolved.frequency_cutoff {
        Some(cutoff) => merged
            .iter()
            .filter(|pattern| pattern.frequency <= cutoff || pattern.is_dynamic())
            .collect(),
        None => merged.iter().collect(),
    };

    let optimizer = ConvergenceOptimizer::new(resolved.branching);
    let mut tree = PathTree::build(candidates.iter().copied());
    let stats = optimizer.optimize(&mut tree)?;
    let structural = tree.dynamic_patterns();
    let refined = refine_dynamic_patterns(structural, &candidates, &optimizer)?;

    debug!(
        branching = resolved.branching,
        frequency_cutoff = ?resolved.frequency_cutoff,
        candidates = candidates.len(),
        refined = refined.len(),
        "Optimized bucket structure"
    );

    let optimal = merge_patterns(merged.into_iter().chain(refined));
    let by_feature = extract_by_features(&optimal, features);
    Ok((merge_patterns(optimal.into_iter().chain(by_feature)), stats))
}
