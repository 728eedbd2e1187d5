//! Values file ordering.
//!
//! Helm applies `-f` files in order, so later entries override earlier ones.
//! The resolved list is, lowest priority first:
//!
//! 1. the application's explicit `valueFiles`
//! 2. value files registered in the version stream
//! 3. global CLI `--values` files, passed through unchecked
//! 4. local override files under `<dir>/<phase>/<app>/` that exist

use crate::apps::Phase;
use std::path::Path;

const LOCAL_VALUE_FILES: [&str; 2] = ["values.yaml", "values.yaml.gotmpl"];

/// Build the values list for one release.
///
/// `app_values` already holds entries 1 and 2. Local overrides are
/// recorded relative to the phase directory. For an application named
/// `prefix/local` the `<local>/` directory is checked as well.
pub fn resolve_values(
    app_values: &[String],
    cli_values: &[String],
    dir: &Path,
    phase: Phase,
    app_name: &str,
) -> Vec<String> {
    let mut values: Vec<String> = app_values.iter().chain(cli_values).cloned().collect();

    let phase_dir = dir.join(phase.as_str());
    let local_name = match app_name.split('/').collect::<Vec<_>>().as_slice() {
        [_, local] if !local.is_empty() => Some(*local),
        _ => None,
    };

    for file in LOCAL_VALUE_FILES {
        for candidate in std::iter::once(app_name).chain(local_name) {
            if phase_dir.join(candidate).join(file).is_file() {
                tracing::debug!("Found local values {}/{} for {}", candidate, file, app_name);
                values.push(format!("{candidate}/{file}"));
            }
        }
    }

    values
}
