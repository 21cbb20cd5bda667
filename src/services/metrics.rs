//! Metrics collection and Prometheus integration service.

use crate::models::BuildInfo;
use prometheus::{
    Counter, CounterVec, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Inference metrics collector for Prometheus integration
#[derive(Clone)]
pub struct InferenceMetrics {
    pub registry: Registry,
    pub entries_ingested_total: Counter,
    pub entries_skipped_total: Counter,
    pub batches_rejected_total: Counter,
    pub buckets_optimized_total: Counter,
    pub nodes_collapsed_total: Counter,
    pub bucket_optimize_duration_seconds: Histogram,
    pub patterns: GaugeVec,
    pub app_info: CounterVec,
}

impl InferenceMetrics {
    /// Create a new metrics collector on its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let entries_ingested_total = Counter::new(
            "route_miner_entries_ingested_total",
            "Raw URL entries accepted into a batch",
        )?;

        let entries_skipped_total = Counter::new(
            "route_miner_entries_skipped_total",
            "Blank raw entries skipped",
        )?;

        let batches_rejected_total = Counter::new(
            "route_miner_batches_rejected_total",
            "Batches aborted because of an error",
        )?;

        let buckets_optimized_total = Counter::new(
            "route_miner_buckets_optimized_total",
            "Origin and length buckets re-optimized",
        )?;

        let nodes_collapsed_total = Counter::new(
            "route_miner_nodes_collapsed_total",
            "Path tree nodes collapsed into dynamic layers",
        )?;

        // Bucket optimization duration histogram
        let bucket_optimize_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "route_miner_bucket_optimize_duration_seconds",
                "Time spent optimizing one bucket in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0,
            ]),
        )?;

        // Canonical pattern counts by kind
        let patterns = GaugeVec::new(
            Opts::new("route_miner_patterns", "Patterns in the canonical set"),
            &["kind"],
        )?;

        // Application info counter
        let app_info = CounterVec::new(
            Opts::new("route_miner_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        // Register all metrics
        registry.register(Box::new(entries_ingested_total.clone()))?;
        registry.register(Box::new(entries_skipped_total.clone()))?;
        registry.register(Box::new(batches_rejected_total.clone()))?;
        registry.register(Box::new(buckets_optimized_total.clone()))?;
        registry.register(Box::new(nodes_collapsed_total.clone()))?;
        registry.register(Box::new(bucket_optimize_duration_seconds.clone()))?;
        registry.register(Box::new(patterns.clone()))?;
        registry.register(Box::new(app_info.clone()))?;

        let info = BuildInfo::current();
        app_info
            .with_label_values(&[
                info.version.as_str(),
                info.commit.as_str(),
                info.build_time.as_str(),
            ])
            .inc();

        Ok(Self {
            registry,
            entries_ingested_total,
            entries_skipped_total,
            batches_rejected_total,
            buckets_optimized_total,
            nodes_collapsed_total,
            bucket_optimize_duration_seconds,
            patterns,
            app_info,
        })
    }

    /// Record the entries of an accepted batch
    pub fn record_batch(&self, accepted: usize, skipped: usize) {
        self.entries_ingested_total.inc_by(accepted as f64);
        self.entries_skipped_total.inc_by(skipped as f64);
    }

    pub fn record_rejected_batch(&self) {
        self.batches_rejected_total.inc();
    }

    /// Record one optimized bucket
    pub fn record_bucket(&self, collapsed: usize, duration: Duration) {
        self.buckets_optimized_total.inc();
        self.nodes_collapsed_total.inc_by(collapsed as f64);
        self.bucket_optimize_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Update the canonical pattern gauges
    pub fn set_pattern_counts(&self, statics: usize, dynamics: usize) {
        self.patterns
            .with_label_values(&["static"])
            .set(statics as f64);
        self.patterns
            .with_label_values(&["dynamic"])
            .set(dynamics as f64);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
