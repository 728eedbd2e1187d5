//! Platform helpers for home directory lookup and user path expansion
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmplan_cli::utils::platform::resolve_path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let stream = resolve_path("~/src/jenkins-x-versions")?;
//! let out = resolve_path("$HOME/env/out")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the current user's home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine home directory.\n\n\
            Set the HOME environment variable or pass --config with an explicit path"
        )
    })
}

/// Expands a leading `~` and `$VAR` / `${VAR}` references in a user-supplied path.
///
/// An undefined variable is an error rather than being left in place, so a
/// typo never turns into a directory literally named `$TYPO`.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Common issues:\n\
            - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
            - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;

    Ok(PathBuf::from(expanded.into_owned()))
}
