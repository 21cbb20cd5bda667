//! Build metadata emitted by `build.rs`.

use serde::{Deserialize, Serialize};

/// Version, commit and build time of the running binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

impl BuildInfo {
    /// Metadata captured at compile time
    ///
    /// The commit is `unknown` when the crate was built outside a git checkout.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown").to_string(),
            build_time: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}
