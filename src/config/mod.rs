//! Configuration structures and loading utilities.
//!
//! This module contains all configuration structures used by the application,
//! including environment variable loading and default values.

pub mod inference;
pub mod metrics;
pub mod telemetry;

pub use inference::*;
pub use metrics::*;
pub use telemetry::*;
