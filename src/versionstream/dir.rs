//! Version stream backed by a directory on disk.

use super::{AppDefaults, RepositoryPrefix, RepositoryPrefixes, StableVersion, VersionKind, VersionStream};
use crate::apps::{Phase, validate_namespace};
use crate::core::HelmplanError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

const REPOSITORIES_FILE: &str = "repositories.yml";
const DEFAULTS_FILE: &str = "defaults.yml";
const DEFAULT_VALUE_FILES: [&str; 2] = ["values.yaml", "values.yaml.gotmpl"];

#[derive(Debug, Deserialize)]
struct RepositoriesFile {
    #[serde(default)]
    repositories: Vec<RepositoryPrefix>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultsFile {
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    value_files: Option<Vec<String>>,
}

/// Reads a version stream checkout rooted at a directory.
#[derive(Debug, Clone)]
pub struct VersionStreamDir {
    root: PathBuf,
}

impl VersionStreamDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read version stream file {}", path.display()))?;
        let value = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse version stream file {}", path.display()))?;
        Ok(Some(value))
    }
}

/// Chart names come from user input and are joined onto the stream root;
/// anything that could leave the root is treated as unknown.
fn is_stream_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

impl VersionStream for VersionStreamDir {
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes> {
        let path = self.root.join(VersionKind::Chart.dir_name()).join(REPOSITORIES_FILE);
        let file: Option<RepositoriesFile> = Self::read_yaml(&path)?;
        let entries = file.map(|f| f.repositories).unwrap_or_default();
        tracing::debug!("Loaded {} repository prefixes from {}", entries.len(), path.display());
        Ok(RepositoryPrefixes::new(entries))
    }

    fn stable_version(&self, kind: VersionKind, name: &str) -> Result<Option<StableVersion>> {
        if !is_stream_relative(name) {
            return Ok(None);
        }
        let path = self.root.join(kind.dir_name()).join(format!("{name}.yml"));
        let version: Option<StableVersion> = Self::read_yaml(&path)?;

        match version {
            Some(v) if v.version.as_deref().is_some_and(|s| !s.trim().is_empty()) => {
                tracing::debug!(
                    "Using stable version {} of {} {}",
                    v.version.as_deref().unwrap_or_default(),
                    kind,
                    name
                );
                Ok(Some(v))
            }
            _ => {
                tracing::warn!(
                    "Could not find a stable version of {} {} in {}",
                    kind,
                    name,
                    self.root.display()
                );
                Ok(None)
            }
        }
    }

    fn application_defaults(&self, chart: &str) -> Result<(AppDefaults, Vec<String>)> {
        if !is_stream_relative(chart) {
            return Ok((AppDefaults::default(), Vec::new()));
        }
        let app_dir = self.root.join("apps").join(chart);
        let path = app_dir.join(DEFAULTS_FILE);
        let file: DefaultsFile = Self::read_yaml(&path)?.unwrap_or_default();

        let phase = match file.phase.filter(|p| !p.trim().is_empty()) {
            None => None,
            Some(value) => Some(value.trim().parse::<Phase>().map_err(|phase| {
                HelmplanError::InvalidPhase {
                    app: chart.to_string(),
                    phase,
                }
            })
            .with_context(|| format!("Invalid defaults in {}", path.display()))?),
        };

        let namespace = file.namespace.map(|ns| ns.trim().to_string()).filter(|ns| !ns.is_empty());
        if let Some(ns) = &namespace {
            validate_namespace(ns, &path.display().to_string())?;
        }

        let defaults = AppDefaults {
            namespace,
            phase,
        };

        let value_files: Vec<String> = match file.value_files {
            Some(files) => {
                files.iter().map(|f| app_dir.join(f).display().to_string()).collect()
            }
            None => DEFAULT_VALUE_FILES
                .iter()
                .map(|f| app_dir.join(f))
                .filter(|p| p.is_file())
                .map(|p| p.display().to_string())
                .collect(),
        };

        if !value_files.is_empty() {
            tracing::debug!("Version stream registers {} value files for {}", value_files.len(), chart);
        }
        Ok((defaults, value_files))
    }
}
