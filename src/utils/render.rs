//! Plain-text rendering of a canonical set.

use crate::models::{CanonicalSet, PatternGroup};
use std::fmt::{self, Write};
use tracing::warn;

const ORIGIN_RULE: &str = "==================================================";
const LENGTH_RULE: &str = "--------------------------------------------------";

/// What to include when rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render only this origin
    pub origin: Option<String>,
    /// Skip static patterns
    pub dynamic_only: bool,
    /// Samples listed under each dynamic pattern
    pub max_samples: usize,
}

/// Render every origin (or only `options.origin`) of the set
pub fn render_canonical_set(set: &CanonicalSet, options: &RenderOptions) -> String {
    let mut out = String::new();
    if let Err(err) = write_canonical_set(&mut out, set, options) {
        warn!(error = %err, "Canonical set report is incomplete");
    }
    out
}

fn write_canonical_set(
    out: &mut String,
    set: &CanonicalSet,
    options: &RenderOptions,
) -> fmt::Result {
    match &options.origin {
        Some(origin) => {
            if let Some(group) = set.group(origin) {
                render_origin(out, origin, group, options)?;
            }
        }
        None => {
            for (origin, group) in set.iter() {
                render_origin(out, origin, group, options)?;
            }
        }
    }
    Ok(())
}

fn render_origin(
    out: &mut String,
    origin: &str,
    group: &PatternGroup,
    options: &RenderOptions,
) -> fmt::Result {
    writeln!(out, "Origin: {origin}")?;
    writeln!(out, "{ORIGIN_RULE}")?;

    for (length, patterns) in group {
        writeln!(out, "Path length: {length}")?;
        writeln!(out, "{LENGTH_RULE}")?;

        for pattern in patterns {
            if options.dynamic_only && !pattern.is_dynamic() {
                continue;
            }
            writeln!(out, "{origin}{pattern}")?;

            if pattern.is_dynamic() && options.max_samples > 0 {
                for sample in pattern.samples.iter().take(options.max_samples) {
                    writeln!(out, "- {origin}{sample}")?;
                }
                writeln!(out)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
