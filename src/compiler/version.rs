//! Chart version resolution.

use crate::versionstream::{VersionKind, VersionStream};
use anyhow::{Context, Result};

/// An explicit version always wins. Otherwise the version stream's pinned
/// chart version is used, and a miss leaves the version unset.
pub fn resolve_version<S: VersionStream>(
    explicit: Option<&str>,
    chart: &str,
    stream: &S,
) -> Result<Option<String>> {
    if let Some(version) = explicit.filter(|v| !v.is_empty()) {
        return Ok(Some(version.to_string()));
    }

    let stable = stream
        .stable_version(VersionKind::Chart, chart)
        .with_context(|| format!("Failed to resolve version of chart {chart}"))?;

    Ok(stable.and_then(|s| s.version))
}
