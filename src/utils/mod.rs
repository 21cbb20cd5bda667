//! Utility functions and helper modules.
//!
//! This module contains URL path normalization, redaction of raw entries and
//! text rendering of canonical sets.

pub mod path;
pub mod redact;
pub mod render;

pub use path::*;
pub use redact::*;
pub use render::*;
