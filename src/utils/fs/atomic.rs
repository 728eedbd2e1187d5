//! Atomic file write operations using temp-and-rename strategy.
//!
//! Helmfiles and generated namespace values files are written through these
//! helpers so an interrupted run never leaves a truncated file behind.

use crate::core::HelmplanError;
use crate::utils::fs::dirs::ensure_dir;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`]. The file either contains the
/// new content or the old content, never a partial write.
///
/// # Examples
///
/// ```rust,no_run
/// use helmplan_cli::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new("apps/helmfile.yaml"), "releases: []\n")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Creates the parent directory if needed
/// 2. Writes content to a sibling temporary file (`.tmp` extension)
/// 3. Syncs the temporary file to disk
/// 4. Renames the temporary file over the target path
///
/// If any step fails the target path keeps its previous content.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .map_err(|e| fs_error("create temp file", &temp_path, &e))?;
        file.write_all(content).map_err(|e| fs_error("write temp file", &temp_path, &e))?;
        file.sync_all().map_err(|e| fs_error("sync temp file", &temp_path, &e))?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(fs_error("rename temp file to", path, &e).into());
    }

    Ok(())
}

pub(crate) fn fs_error(operation: &str, path: &Path, error: &std::io::Error) -> HelmplanError {
    HelmplanError::FileSystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}
