//! Helmfile serialization.

use crate::apps::Phase;
use crate::helmfile::HelmState;
use crate::utils::fs::safe_write;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const HELMFILE_NAME: &str = "helmfile.yaml";

/// Path of a phase's helmfile under the output directory.
pub fn helmfile_path(output_dir: &Path, phase: Phase) -> PathBuf {
    output_dir.join(phase.as_str()).join(HELMFILE_NAME)
}

/// Render the whole document, then write it atomically to
/// `<output_dir>/<phase>/helmfile.yaml`.
pub fn write_helmfile(state: &HelmState, output_dir: &Path, phase: Phase) -> Result<PathBuf> {
    let content = serde_yaml::to_string(state).context("Failed to marshal helmfile data")?;
    let path = helmfile_path(output_dir, phase);
    safe_write(&path, &content).with_context(|| format!("Failed to write helmfile {}", path.display()))?;
    Ok(path)
}
