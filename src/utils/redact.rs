//! Redaction of credentials and query strings in raw URL text.
//!
//! Malformed entries cannot go through the `url` parser, so redaction works
//! on the raw text before it is placed in errors or logs.

use regex::Regex;
use std::sync::LazyLock;

/// Patterns masked in raw URL text, with their replacement
static SENSITIVE_URL_PARTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"//[^/@\s]+@", "//[REDACTED]@"), // userinfo
        (r"\?[^#\s]*", "?[REDACTED]"),      // query string
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| {
        Regex::new(pattern).ok().map(|regex| (regex, replacement))
    })
    .collect()
});

/// Longest raw entry echoed back verbatim
const MAX_ECHO_LEN: usize = 256;

/// Redact userinfo and query strings from a raw URL entry
pub fn redact_url(input: &str) -> String {
    let mut result = input.to_string();

    for (regex, replacement) in SENSITIVE_URL_PARTS.iter() {
        result = regex.replace_all(&result, *replacement).to_string();
    }

    if result.chars().count() > MAX_ECHO_LEN {
        result = result.chars().take(MAX_ECHO_LEN).collect::<String>() + "…";
    }

    result
}
