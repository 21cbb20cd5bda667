//! Reconciliation of pattern lists into one canonical bucket.

use crate::models::Pattern;
use std::collections::HashMap;

/// Merge patterns of one (origin, length) bucket
///
/// - static patterns with the same key are deduplicated, summing frequency;
/// - a dynamic pattern absorbs every dynamic pattern it contains, or is
///   absorbed by the first existing one that contains it;
/// - each surviving dynamic pattern absorbs the static patterns it matches.
///
/// Statics come first, then dynamics, each in first-seen order.
pub fn merge_patterns<I>(patterns: I) -> Vec<Pattern>
where
    I: IntoIterator<Item = Pattern>,
{
    let mut statics: Vec<Pattern> = Vec::new();
    let mut static_index: HashMap<String, usize> = HashMap::new();
    let mut dynamics: Vec<Pattern> = Vec::new();

    for mut pattern in patterns {
        if pattern.is_dynamic() {
            let (absorbed, kept): (Vec<Pattern>, Vec<Pattern>) = std::mem::take(&mut dynamics)
                .into_iter()
                .partition(|existing| pattern.contains(existing));
            dynamics = kept;
            for existing in absorbed {
                pattern.absorb(existing);
            }

            match dynamics
                .iter_mut()
                .find(|existing| existing.contains(&pattern))
            {
                Some(container) => container.absorb(pattern),
                None => dynamics.push(pattern),
            }
        } else {
            let key = pattern.key();
            match static_index.get(&key) {
                Some(&index) => statics[index].frequency += pattern.frequency,
                None => {
                    static_index.insert(key, statics.len());
                    statics.push(pattern);
                }
            }
        }
    }

    for dynamic in &mut dynamics {
        let (matched, rest): (Vec<Pattern>, Vec<Pattern>) = std::mem::take(&mut statics)
            .into_iter()
            .partition(|candidate| dynamic.matches(candidate));
        statics = rest;
        for pattern in matched {
            dynamic.absorb(pattern);
        }
    }

    statics.extend(dynamics);
    statics
}
