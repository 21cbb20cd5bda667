//! Path segment model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered in place of a dynamic segment
pub const DYNAMIC_PLACEHOLDER: &str = ":param";

/// One component of a URL path, either a literal or a generalized parameter
///
/// Ordering puts every static segment before the dynamic one, which keeps
/// trie traversal deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Segment {
    Static(String),
    Dynamic,
}

impl Segment {
    /// Create a literal segment
    pub fn new_static(value: impl Into<String>) -> Self {
        Segment::Static(value.into())
    }

    /// Create a dynamic placeholder segment
    pub fn new_dynamic() -> Self {
        Segment::Dynamic
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Segment::Dynamic)
    }

    /// Literal value, empty for a dynamic segment
    pub fn value(&self) -> &str {
        match self {
            Segment::Static(value) => value,
            Segment::Dynamic => "",
        }
    }

    /// Structural identity: tag plus value
    pub fn key(&self) -> String {
        match self {
            Segment::Static(value) => format!("static:{value}"),
            Segment::Dynamic => "dynamic:".to_string(),
        }
    }

    pub fn render(&self) -> &str {
        match self {
            Segment::Static(value) => value,
            Segment::Dynamic => DYNAMIC_PLACEHOLDER,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}
