//! Dynamic-segment features: value tests that mark a literal as a parameter.

use crate::error::Result;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("numeric feature pattern is valid"));
static PERCENT_ENCODED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(%[a-zA-Z\d]{2})+").expect("percent-encoded feature pattern is valid")
});
static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid feature pattern is valid")
});
static HEX_DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[0-9a-f]{32,}$").expect("hex feature pattern is valid"));

type ValuePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A test deciding whether a literal segment value is really a parameter
#[derive(Clone)]
pub enum DynamicFeature {
    /// Matches when the regex finds a match anywhere in the value
    ValuePattern(Regex),
    /// Arbitrary caller-supplied test
    Predicate(ValuePredicate),
}

impl DynamicFeature {
    /// Compile a regex feature
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(DynamicFeature::ValuePattern(Regex::new(pattern)?))
    }

    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        DynamicFeature::Predicate(Arc::new(test))
    }

    /// Purely numeric values such as `42`
    pub fn numeric() -> Self {
        DynamicFeature::ValuePattern(NUMERIC.clone())
    }

    /// Values carrying percent-encoded bytes
    pub fn percent_encoded() -> Self {
        DynamicFeature::ValuePattern(PERCENT_ENCODED.clone())
    }

    pub fn uuid() -> Self {
        DynamicFeature::ValuePattern(UUID.clone())
    }

    /// Long hexadecimal tokens (md5 and wider digests)
    pub fn hex_digest() -> Self {
        DynamicFeature::ValuePattern(HEX_DIGEST.clone())
    }

    /// The presets enabled by `--default-features`
    pub fn defaults() -> Vec<Self> {
        vec![Self::numeric(), Self::percent_encoded()]
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            DynamicFeature::ValuePattern(regex) => regex.is_match(value),
            DynamicFeature::Predicate(test) => test(value),
        }
    }
}

impl fmt::Debug for DynamicFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicFeature::ValuePattern(regex) => {
                f.debug_tuple("ValuePattern").field(&regex.as_str()).finish()
            }
            DynamicFeature::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
