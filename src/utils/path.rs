//! URL path normalization.

use url::Url;

/// Split a parsed URL into its origin and normalized path components
///
/// Redundant separators collapse and a single trailing separator is dropped,
/// so `/users//1/` yields `["users", "1"]`. The root path yields no components.
pub fn split_url(url: &Url) -> (String, Vec<String>) {
    (url.origin().ascii_serialization(), path_components(url.path()))
}

/// Normalized components of a raw path string
pub fn path_components(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|component| !component.is_empty())
        .map(str::to_string)
        .collect()
}
