//! Route Miner - inference of parameterized route templates from raw URLs
//!
//! Given batches of observed URLs, the miner learns the route templates
//! behind them, such as `/users/:param` from `/users/1`, `/users/2`, ...
//! The canonical set it keeps is grouped by origin and path length and is
//! refined incrementally with every batch.
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Segments, patterns, the canonical set and tuning knobs
//! - `services/` - Grouping, path trees, convergence optimization, merging
//!   and the stateful [`RouteMiner`]
//! - `utils/` - URL splitting, redaction and plain-text rendering
//! - `config/` - Configuration structures and environment loading
//! - `telemetry` - Structured logging setup
//! - `error` - Error taxonomy
//!
//! ## Quick Start
//!
//! ```
//! use route_miner::{RouteMiner, Threshold};
//!
//! let mut miner = RouteMiner::new(Threshold::Fixed(2), Vec::new());
//! miner
//!     .update([
//!         "https://example.com/users/1",
//!         "https://example.com/users/2",
//!         "https://example.com/users/3",
//!     ])
//!     .unwrap();
//!
//! let patterns = miner.canonical_set().bucket("https://example.com", 2);
//! assert_eq!(patterns[0].to_string(), "/users/:param");
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{InferenceConfig, LogFormat, MetricsConfig, TelemetryConfig};
pub use error::{Result, RouteMinerError};
pub use models::{
    BuildInfo, CanonicalSet, DynamicFeature, Pattern, PatternGroup, ResolvedThreshold, Segment,
    Threshold,
};
pub use services::{
    GroupedUrls, InferenceMetrics, OptimizeStats, RouteMiner, UpdateSummary, group_urls,
    merge_patterns, optimize_patterns,
};
pub use telemetry::init_tracing;
pub use utils::{RenderOptions, render_canonical_set};
