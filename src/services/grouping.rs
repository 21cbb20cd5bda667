//! Grouping of raw URLs into per-origin, per-length pattern buckets.

use crate::error::{Result, RouteMinerError};
use crate::models::{CanonicalSet, Pattern};
use crate::utils::{redact_url, split_url};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Raw URLs grouped into static patterns
#[derive(Debug, Default)]
pub struct GroupedUrls {
    pub patterns: CanonicalSet,
    /// Non-blank entries that were counted
    pub accepted: usize,
    /// Blank entries that were skipped
    pub skipped: usize,
}

impl GroupedUrls {
    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }
}

/// Group raw URLs by origin and path length
///
/// Each distinct (origin, normalized path) pair becomes one static pattern
/// whose frequency is its occurrence count. Blank entries are skipped. The
/// first entry that fails to parse aborts the whole batch.
pub fn group_urls<I, S>(urls: I) -> Result<GroupedUrls>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // First-seen order of (origin, components), with occurrence counts
    let mut order: Vec<(String, Vec<String>)> = Vec::new();
    let mut counts: HashMap<(String, Vec<String>), u64> = HashMap::new();
    let mut skipped = 0;
    let mut accepted = 0;

    for (index, raw) in urls.into_iter().enumerate() {
        let entry = raw.as_ref().trim();
        if entry.is_empty() {
            skipped += 1;
            continue;
        }

        let url = Url::parse(entry).map_err(|source| RouteMinerError::MalformedInput {
            position: index + 1,
            input: redact_url(entry),
            source,
        })?;
        let key = split_url(&url);

        match counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
        accepted += 1;
    }

    let mut patterns = CanonicalSet::new();
    for key in order {
        let frequency = counts.get(&key).copied().unwrap_or_default();
        let (origin, components) = key;
        patterns.push(&origin, Pattern::from_components(components, frequency));
    }

    debug!(accepted, skipped, "Grouped raw URLs");

    Ok(GroupedUrls {
        patterns,
        accepted,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_distinct_paths() {
        let grouped = group_urls([
            "https://a.test/users/1",
            "https://a.test/users/1/",
            "https://a.test//users//1",
            "https://a.test/users/2",
        ])
        .unwrap();

        let bucket = grouped.patterns.bucket("https://a.test", 2);
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].to_string(), "/users/1");
        assert_eq!(bucket[0].frequency, 3);
        assert_eq!(bucket[1].frequency, 1);
        assert_eq!(grouped.accepted, 4);
    }

    #[test]
    fn test_buckets_by_origin_and_length() {
        let grouped = group_urls([
            "https://a.test/",
            "https://a.test",
            "http://a.test/x",
            "https://b.test:8443/x/y",
        ])
        .unwrap();

        assert_eq!(grouped.patterns.bucket("https://a.test", 0)[0].frequency, 2);
        assert_eq!(grouped.patterns.bucket("http://a.test", 1).len(), 1);
        assert_eq!(grouped.patterns.bucket("https://b.test:8443", 2).len(), 1);
        assert_eq!(grouped.patterns.origins().count(), 3);
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let grouped = group_urls(["", "   ", "https://a.test/x", "\t"]).unwrap();
        assert_eq!(grouped.accepted, 1);
        assert_eq!(grouped.skipped, 3);
        assert!(!grouped.is_empty());

        let empty = group_urls(Vec::<String>::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.patterns.is_empty());
    }

    #[test]
    fn test_malformed_entry_aborts_batch() {
        let err = group_urls(["https://a.test/x", "not a url", "https://a.test/y"]).unwrap_err();
        match err {
            RouteMinerError::MalformedInput { position, input, .. } => {
                assert_eq!(position, 2);
                assert_eq!(input, "not a url");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_entry_is_redacted() {
        let err = group_urls(["https://user:secret@[bad/path?token=abc"]).unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("secret"));
        assert!(!message.contains("abc"));
    }
}
