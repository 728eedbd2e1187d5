//! Directory operations for creating and removing directories.

use super::atomic::fs_error;
use crate::core::HelmplanError;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// Returns an error if the path exists but is not a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use helmplan_cli::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("out/system/generated/velero"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| fs_error("create directory", path, &e))?;
    } else if !path.is_dir() {
        return Err(HelmplanError::FileSystemError {
            operation: "create directory".to_string(),
            path: path.display().to_string(),
            reason: "path exists but is not a directory".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Removes a directory and everything below it. A missing directory is not an error.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| fs_error("remove directory", path, &e))?;
    }
    Ok(())
}
