//! Version probing from `show info` output.
//!
//! Newer runtime verbs are gated on the control plane version; the probe is
//! a soft feature check, so any malformed output parses to `None` instead of
//! raising.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the `Version:` line of a `show info` response.
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version:\s*(\d+)\.(\d+)").expect("Invalid version regex"));

/// Minimum control-plane version understanding `set server ... state drain`.
pub const MIN_DRAIN_VERSION: (u32, u32) = (1, 5);

/// Extracts the `(major, minor)` version from a `show info` response.
///
/// Returns `None` when no line carries a parseable version marker.
pub fn parse_version(show_info: &str) -> Option<(u32, u32)> {
    for line in show_info.lines() {
        if let Some(captures) = VERSION_REGEX.captures(line) {
            let major = captures[1].parse().ok()?;
            let minor = captures[2].parse().ok()?;
            return Some((major, minor));
        }
    }
    None
}

/// Whether a probed version supports the drain verb.
pub fn supports_drain(version: Option<(u32, u32)>) -> bool {
    matches!(version, Some(v) if v >= MIN_DRAIN_VERSION)
}
