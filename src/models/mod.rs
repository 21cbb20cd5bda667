//! Data models for route inference.
//!
//! This module contains the value types the algorithm works on: segments,
//! patterns, the canonical set and the caller-supplied threshold and feature
//! settings, plus the build metadata of the binary.

pub mod build;
pub mod feature;
pub mod group;
pub mod pattern;
pub mod segment;
pub mod threshold;

pub use build::*;
pub use feature::*;
pub use group::*;
pub use pattern::*;
pub use segment::*;
pub use threshold::*;
