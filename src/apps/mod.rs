//! Application list (`jx-apps.yml`) loading and validation
//!
//! The file is parsed into a raw serde shape first and then converted into
//! [`AppConfig`], so that a bad `phase` or `namespace` is reported against
//! the application that declared it rather than as a bare YAML error.
//!
//! ```yaml
//! defaultNamespace: jx
//! apps:
//!   - name: stable/velero
//!     namespace: velero
//!     phase: system
//!   - name: jenkins-x/lighthouse
//!     version: 0.0.633
//!     valueFiles: [lighthouse-extra.yaml]
//! repositories:
//!   - name: bitnami
//!     url: https://charts.bitnami.com/bitnami
//! ```

use crate::core::HelmplanError;
use crate::helmfile::RepositorySpec;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File name of the application list inside the environment directory.
pub const APPS_FILE: &str = "jx-apps.yml";

/// Kubernetes namespace names are RFC 1123 labels.
const NAMESPACE_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";
const NAMESPACE_MAX_LEN: usize = 63;

/// Installation stage. `System` releases are installed before `Apps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Phase {
    System,
    #[default]
    Apps,
}

impl Phase {
    /// All phases in installation order.
    pub const ALL: [Self; 2] = [Self::System, Self::Apps];

    /// Directory name under the output directory.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Apps => "apps",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "apps" => Ok(Self::Apps),
            other => Err(other.to_string()),
        }
    }
}

/// One declared application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct App {
    /// Chart name, optionally prefixed (`stable/velero`)
    pub name: String,
    /// URL, registered prefix, local path, or empty
    pub repository: String,
    pub namespace: Option<String>,
    /// `None` until defaults are applied; treated as [`Phase::Apps`]
    pub phase: Option<Phase>,
    pub version: Option<String>,
    /// Explicit value files, applied before any discovered ones
    pub value_files: Vec<String>,
}

impl App {
    /// Shorthand used by tests and fixtures.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub const fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_value_file(mut self, file: impl Into<String>) -> Self {
        self.value_files.push(file.into());
        self
    }

    /// The phase this application is installed in.
    #[must_use]
    pub fn effective_phase(&self) -> Phase {
        self.phase.unwrap_or_default()
    }
}

/// The whole `jx-apps.yml` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub apps: Vec<App>,
    pub default_namespace: Option<String>,
    /// Extra repositories merged into every phase
    pub repositories: Vec<RepositorySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAppConfig {
    #[serde(default)]
    apps: Vec<RawApp>,
    #[serde(default)]
    default_namespace: Option<String>,
    #[serde(default)]
    repositories: Vec<RepositorySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApp {
    #[serde(default)]
    name: String,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    value_files: Vec<String>,
}

impl AppConfig {
    /// Load `jx-apps.yml` from an environment directory.
    ///
    /// # Errors
    ///
    /// - [`HelmplanError::AppsConfigNotFound`] if the file does not exist
    /// - [`HelmplanError::AppsConfigParseError`] if it is not valid YAML
    /// - [`HelmplanError::InvalidPhase`] / [`HelmplanError::InvalidApplication`]
    ///   for entries that fail validation
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(APPS_FILE);
        if !path.is_file() {
            return Err(HelmplanError::AppsConfigNotFound {
                dir: dir.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!("Loaded {} applications from {}", config.apps.len(), path.display());
        Ok(config)
    }

    /// Parse and validate the YAML content of an application list.
    ///
    /// `file` is only used in error messages.
    pub fn parse(content: &str, file: &str) -> Result<Self> {
        let raw: RawAppConfig =
            serde_yaml::from_str(content).map_err(|e| HelmplanError::AppsConfigParseError {
                file: file.to_string(),
                reason: e.to_string(),
            })?;

        let namespace_pattern = Regex::new(NAMESPACE_PATTERN)?;

        let default_namespace = non_empty(raw.default_namespace);
        if let Some(ns) = &default_namespace
            && !is_valid_namespace(&namespace_pattern, ns)
        {
            return Err(HelmplanError::Other {
                message: format!("Invalid defaultNamespace '{ns}' in {file}"),
            }
            .into());
        }

        let apps = raw
            .apps
            .into_iter()
            .map(|raw| convert_app(raw, &namespace_pattern))
            .collect::<Result<Vec<_>, HelmplanError>>()?;

        Ok(Self {
            apps,
            default_namespace,
            repositories: raw.repositories,
        })
    }
}

fn convert_app(raw: RawApp, namespace_pattern: &Regex) -> Result<App, HelmplanError> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(HelmplanError::InvalidApplication {
            name,
            reason: "missing required field 'name'".to_string(),
        });
    }

    let phase = match non_empty(raw.phase) {
        None => None,
        Some(value) => Some(value.parse::<Phase>().map_err(|phase| HelmplanError::InvalidPhase {
            app: name.clone(),
            phase,
        })?),
    };

    let namespace = non_empty(raw.namespace);
    if let Some(ns) = &namespace
        && !is_valid_namespace(namespace_pattern, ns)
    {
        return Err(HelmplanError::InvalidApplication {
            name,
            reason: format!(
                "namespace '{ns}' is not a valid Kubernetes namespace name (lowercase alphanumerics and '-', at most {NAMESPACE_MAX_LEN} characters)"
            ),
        });
    }

    Ok(App {
        name,
        repository: raw.repository.unwrap_or_default().trim().to_string(),
        namespace,
        phase,
        version: non_empty(raw.version),
        value_files: raw.value_files,
    })
}

/// Reject a namespace that did not come from `jx-apps.yml`. `origin` names
/// its source in the error.
pub fn validate_namespace(namespace: &str, origin: &str) -> Result<()> {
    let pattern = Regex::new(NAMESPACE_PATTERN)?;
    if is_valid_namespace(&pattern, namespace) {
        return Ok(());
    }
    Err(HelmplanError::InvalidNamespace {
        namespace: namespace.to_string(),
        origin: origin.to_string(),
    }
    .into())
}

fn is_valid_namespace(pattern: &Regex, namespace: &str) -> bool {
    namespace.len() <= NAMESPACE_MAX_LEN && pattern.is_match(namespace)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
