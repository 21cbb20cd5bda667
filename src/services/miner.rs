//! Stateful route inference across batches.

use super::grouping::group_urls;
use super::inference::optimize_patterns_with_stats;
use super::metrics::InferenceMetrics;
use crate::config::InferenceConfig;
use crate::error::Result;
use crate::models::{CanonicalSet, DynamicFeature, Pattern, Threshold};
use crate::utils::{RenderOptions, render_canonical_set};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one [`RouteMiner::update`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Non-blank entries counted
    pub accepted: usize,
    /// Blank entries skipped
    pub skipped: usize,
    /// (origin, length) buckets that were re-optimized
    pub buckets_updated: usize,
    pub elapsed: Duration,
}

impl UpdateSummary {
    /// True when the batch held no usable entry and nothing changed
    pub fn is_noop(&self) -> bool {
        self.buckets_updated == 0
    }
}

/// Route miner holding the canonical set between batches
///
/// Each [`update`](Self::update) folds a batch of raw URLs into the current
/// canonical set. A failing batch leaves the set exactly as it was.
#[derive(Clone)]
pub struct RouteMiner {
    threshold: Threshold,
    features: Vec<DynamicFeature>,
    group: CanonicalSet,
    metrics: Option<InferenceMetrics>,
}

impl Default for RouteMiner {
    fn default() -> Self {
        Self::new(Threshold::default(), Vec::new())
    }
}

impl RouteMiner {
    pub fn new(threshold: Threshold, features: Vec<DynamicFeature>) -> Self {
        Self {
            threshold,
            features,
            group: CanonicalSet::new(),
            metrics: None,
        }
    }

    /// Build a miner from configuration, compiling its feature expressions
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        Ok(Self::new(config.to_threshold(), config.compile_features()?))
    }

    /// Report to the given metrics collector
    pub fn with_metrics(mut self, metrics: InferenceMetrics) -> Self {
        self.metrics = Some(metrics);
        self.refresh_gauges();
        self
    }

    /// Start from a previously saved snapshot
    pub fn with_snapshot(mut self, json: &str) -> Result<Self> {
        self.load_snapshot(json)?;
        Ok(self)
    }

    /// Replace the canonical set with a saved snapshot
    pub fn load_snapshot(&mut self, json: &str) -> Result<()> {
        let group = CanonicalSet::from_json(json)?;
        let (statics, dynamics) = group.pattern_counts();
        info!(
            origins = group.origins().count(),
            statics, dynamics, "Loaded canonical snapshot"
        );
        self.group = group;
        self.refresh_gauges();
        Ok(())
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn features(&self) -> &[DynamicFeature] {
        &self.features
    }

    pub fn canonical_set(&self) -> &CanonicalSet {
        &self.group
    }

    pub fn metrics(&self) -> Option<&InferenceMetrics> {
        self.metrics.as_ref()
    }

    /// Fold a batch of raw URLs into the canonical set
    ///
    /// Every touched bucket is recomputed before any is written back, so an
    /// error from any entry or bucket leaves the set untouched.
    pub fn update<I, S>(&mut self, urls: I) -> Result<UpdateSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let started = Instant::now();
        match self.apply_batch(urls, started) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                warn!(error = %err, "Rejected URL batch");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejected_batch();
                }
                Err(err)
            }
        }
    }

    fn apply_batch<I, S>(&mut self, urls: I, started: Instant) -> Result<UpdateSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let grouped = group_urls(urls)?;
        if grouped.is_empty() {
            debug!(skipped = grouped.skipped, "Empty batch, nothing to update");
            return Ok(UpdateSummary {
                skipped: grouped.skipped,
                elapsed: started.elapsed(),
                ..Default::default()
            });
        }

        let mut staged: Vec<(String, usize, Vec<Pattern>, usize, Duration)> = Vec::new();
        for (origin, lengths) in grouped.patterns.iter() {
            for (&length, raw) in lengths {
                let bucket_started = Instant::now();
                let prior = self.group.bucket(origin, length).to_vec();
                let (optimal, stats) = optimize_patterns_with_stats(
                    prior,
                    raw.clone(),
                    &self.threshold,
                    &self.features,
                )?;
                let duration = bucket_started.elapsed();

                debug!(
                    origin,
                    length,
                    patterns = optimal.len(),
                    collapsed = stats.collapsed,
                    dynamic_nodes = stats.dynamic_nodes,
                    "Optimized bucket"
                );
                staged.push((origin.to_string(), length, optimal, stats.collapsed, duration));
            }
        }

        let buckets_updated = staged.len();
        let mut timings = Vec::with_capacity(buckets_updated);
        for (origin, length, patterns, collapsed, duration) in staged {
            self.group.set_bucket(&origin, length, patterns);
            timings.push((collapsed, duration));
        }

        // Only a committed batch reaches the metrics
        if let Some(metrics) = &self.metrics {
            for (collapsed, duration) in timings {
                metrics.record_bucket(collapsed, duration);
            }
            metrics.record_batch(grouped.accepted, grouped.skipped);
        }
        self.refresh_gauges();

        let summary = UpdateSummary {
            accepted: grouped.accepted,
            skipped: grouped.skipped,
            buckets_updated,
            elapsed: started.elapsed(),
        };
        info!(
            accepted = summary.accepted,
            skipped = summary.skipped,
            buckets = summary.buckets_updated,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Applied URL batch"
        );
        Ok(summary)
    }

    /// Encode the canonical set as a JSON snapshot
    pub fn to_json(&self) -> Result<String> {
        Ok(self.group.to_json()?)
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        render_canonical_set(&self.group, options)
    }

    fn refresh_gauges(&self) {
        if let Some(metrics) = &self.metrics {
            let (statics, dynamics) = self.group.pattern_counts();
            metrics.set_pattern_counts(statics, dynamics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteMinerError;

    const ORIGIN: &str = "https://shop.example.com";

    fn urls(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| format!("{ORIGIN}{path}")).collect()
    }

    fn bucket(miner: &RouteMiner, length: usize) -> Vec<(String, u64)> {
        miner
            .canonical_set()
            .bucket(ORIGIN, length)
            .iter()
            .map(|pattern| (pattern.to_string(), pattern.frequency))
            .collect()
    }

    #[test]
    fn test_update_collapses_ids() {
        let mut miner = RouteMiner::new(Threshold::Fixed(3), Vec::new());
        let summary = miner
            .update(urls(&["/users/1", "/users/2", "/users/3", "/users/4"]))
            .unwrap();

        assert_eq!(summary.accepted, 4);
        assert_eq!(summary.buckets_updated, 1);
        assert_eq!(bucket(&miner, 2), vec![("/users/:param".to_string(), 4)]);
    }

    #[test]
    fn test_incremental_updates_accumulate() {
        let mut miner = RouteMiner::new(Threshold::Fixed(3), Vec::new());
        miner
            .update(urls(&["/users/1", "/users/2", "/users/3", "/users/4"]))
            .unwrap();
        miner.update(urls(&["/users/9", "/users/10"])).unwrap();

        assert_eq!(bucket(&miner, 2), vec![("/users/:param".to_string(), 6)]);
        let pattern = &miner.canonical_set().bucket(ORIGIN, 2)[0];
        assert_eq!(pattern.samples.len(), 6);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut miner = RouteMiner::new(Threshold::Fixed(3), Vec::new());
        let summary = miner.update(["", "   "]).unwrap();
        assert!(summary.is_noop());
        assert_eq!(summary.skipped, 2);
        assert!(miner.canonical_set().is_empty());
    }

    #[test]
    fn test_malformed_entry_leaves_state_untouched() {
        let mut miner = RouteMiner::new(Threshold::Fixed(3), Vec::new());
        miner.update(urls(&["/users/1"])).unwrap();
        let before = miner.to_json().unwrap();

        let mut batch = urls(&["/users/2", "/users/3"]);
        batch.push("not a url".to_string());
        let err = miner.update(batch).unwrap_err();

        assert!(matches!(
            err,
            RouteMinerError::MalformedInput { position: 3, .. }
        ));
        assert_eq!(miner.to_json().unwrap(), before);
    }

    #[test]
    fn test_snapshot_restores_state() {
        let mut miner = RouteMiner::new(Threshold::Fixed(3), Vec::new());
        miner
            .update(urls(&["/users/1", "/users/2", "/users/3", "/about"]))
            .unwrap();
        let json = miner.to_json().unwrap();

        let restored = RouteMiner::new(Threshold::Fixed(3), Vec::new())
            .with_snapshot(&json)
            .unwrap();
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn test_bad_snapshot_is_rejected() {
        let mut miner = RouteMiner::default();
        let err = miner.load_snapshot("{not json").unwrap_err();
        assert!(matches!(err, RouteMinerError::Snapshot(_)));
    }

    #[test]
    fn test_metrics_follow_updates() {
        let metrics = InferenceMetrics::new().unwrap();
        let mut miner =
            RouteMiner::new(Threshold::Fixed(3), Vec::new()).with_metrics(metrics.clone());

        miner
            .update(urls(&["/users/1", "/users/2", "/users/3", "/users/4"]))
            .unwrap();
        assert_eq!(metrics.entries_ingested_total.get(), 4.0);
        assert_eq!(metrics.buckets_optimized_total.get(), 1.0);
        assert_eq!(
            metrics.patterns.with_label_values(&["dynamic"]).get(),
            1.0
        );

        assert!(miner.update(["::"]).is_err());
        assert_eq!(metrics.batches_rejected_total.get(), 1.0);
    }

    #[test]
    fn test_rejected_batch_records_no_bucket_work() {
        let metrics = InferenceMetrics::new().unwrap();
        let mut miner =
            RouteMiner::new(Threshold::Fixed(3), Vec::new()).with_metrics(metrics.clone());
        miner.update(urls(&["/users/1", "/users/2"])).unwrap();
        let optimized = metrics.buckets_optimized_total.get();
        let observed = metrics.bucket_optimize_duration_seconds.get_sample_count();

        let mut batch = urls(&["/users/3", "/orders/9/items"]);
        batch.push("https://".to_string());
        assert!(miner.update(batch).is_err());

        assert_eq!(metrics.buckets_optimized_total.get(), optimized);
        assert_eq!(
            metrics.bucket_optimize_duration_seconds.get_sample_count(),
            observed
        );
        assert_eq!(metrics.entries_ingested_total.get(), 2.0);
        assert_eq!(metrics.batches_rejected_total.get(), 1.0);
    }
}
