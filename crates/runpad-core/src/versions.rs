//! Runtime version policy for outbound execution requests.

use crate::languages;

/// Sent to the engine when a language has no pinned version; means "any".
pub const ANY_VERSION: &str = "*";

const LATEST: &str = "latest";

/// Pick the runtime version to request from the engine.
///
/// Absent, blank and `"latest"` versions resolve to the language's pinned
/// default, or to [`ANY_VERSION`] for languages outside the registry. Any other
/// value is passed through untouched; the engine is the one to reject it.
pub fn resolve_version(language: &str, requested: Option<&str>) -> String {
    match requested {
        Some(version) if !is_placeholder(version) => version.to_string(),
        _ => languages::lookup(language)
            .map(|descriptor| descriptor.default_version)
            .unwrap_or(ANY_VERSION)
            .to_string(),
    }
}

fn is_placeholder(version: &str) -> bool {
    version.trim().is_empty() || version == LATEST
}
