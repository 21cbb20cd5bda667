//! Business logic and service layer modules.
//!
//! This module contains the inference pipeline: grouping raw URLs, building
//! and collapsing path trees, refining and merging patterns, plus the
//! stateful miner and its metrics collection.

pub mod features;
pub mod grouping;
pub mod inference;
pub mod merger;
pub mod metrics;
pub mod miner;
pub mod optimizer;
pub mod refinement;
pub mod tree;

pub use features::*;
pub use grouping::*;
pub use inference::*;
pub use merger::*;
pub use metrics::*;
pub use miner::*;
pub use optimizer::*;
pub use refinement::*;
pub use tree::*;
