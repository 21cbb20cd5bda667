//! Error taxonomy for route inference.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteMinerError>;

/// Errors that can occur while grouping, optimizing or encoding patterns
#[derive(Debug, Error)]
pub enum RouteMinerError {
    /// A raw entry could not be parsed as an absolute URL. Aborts the whole batch.
    #[error("Malformed URL at entry {position}: {input} ({source})")]
    MalformedInput {
        position: usize,
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Two trees with different root segments were handed to a tree union.
    #[error("Invariant violation: cannot merge trees rooted at `{left}` and `{right}`")]
    InvariantViolation { left: String, right: String },

    #[error("Invalid dynamic feature pattern: {0}")]
    InvalidFeature(#[from] regex::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl RouteMinerError {
    /// Whether the error points at a programming fault rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, RouteMinerError::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message() {
        let err = RouteMinerError::MalformedInput {
            position: 3,
            input: "not a url".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        let message = err.to_string();
        assert!(message.contains("entry 3"));
        assert!(message.contains("not a url"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_invariant_violation_is_fatal() {
        let err = RouteMinerError::InvariantViolation {
            left: "static:a".to_string(),
            right: "dynamic:".to_string(),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("static:a"));
    }
}
