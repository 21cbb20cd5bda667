//! Inference configuration.

use crate::error::Result;
use crate::models::{DEFAULT_BRANCHING_THRESHOLD, DynamicFeature, Threshold};
use std::env;
use tracing::warn;

/// Configuration for the inference engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Distinct children a tree position needs before it collapses
    pub threshold: usize,
    /// Patterns seen more often than this are kept out of structural optimization
    pub frequency_cutoff: Option<u64>,
    /// Regular expressions marking segment values as dynamic
    pub dynamic_features: Vec<String>,
    /// Add the numeric and percent-encoded presets
    pub default_features: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BRANCHING_THRESHOLD,
            frequency_cutoff: None,
            dynamic_features: Vec::new(),
            default_features: false,
        }
    }
}

impl InferenceConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let threshold = match env::var("ROUTE_MINER_THRESHOLD") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(value = %raw, "Ignoring invalid ROUTE_MINER_THRESHOLD");
                    DEFAULT_BRANCHING_THRESHOLD
                }
            },
            Err(_) => DEFAULT_BRANCHING_THRESHOLD,
        };

        let frequency_cutoff = env::var("ROUTE_MINER_FREQUENCY_CUTOFF").ok().and_then(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| warn!(value = %raw, "Ignoring invalid ROUTE_MINER_FREQUENCY_CUTOFF"))
                .ok()
        });

        let dynamic_features = env::var("ROUTE_MINER_DYNAMIC_FEATURES")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let default_features = env::var("ROUTE_MINER_DEFAULT_FEATURES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Self {
            threshold,
            frequency_cutoff,
            dynamic_features,
            default_features,
        }
    }

    pub fn to_threshold(&self) -> Threshold {
        match self.frequency_cutoff {
            Some(frequency_cutoff) => Threshold::WithFrequencyCutoff {
                branching: self.threshold,
                frequency_cutoff,
            },
            None => Threshold::Fixed(self.threshold),
        }
    }

    /// Compile the configured features, presets first
    pub fn compile_features(&self) -> Result<Vec<DynamicFeature>> {
        let mut features = if self.default_features {
            DynamicFeature::defaults()
        } else {
            Vec::new()
        };
        for pattern in &self.dynamic_features {
            features.push(DynamicFeature::pattern(pattern)?);
        }
        Ok(features)
    }
}
