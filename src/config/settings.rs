//! User settings loaded from `~/.helmplan/config.toml`
//!
//! Settings replace the process-wide team configuration that chart resolution
//! would otherwise consult. Every field has a default, so a missing file is
//! equivalent to an empty one.
//!
//! # Example
//!
//! ```toml
//! team_apps_repository = "https://charts.example.com"
//! default_namespace = "jx"
//! helm_timeout = 600
//! extra_values = ["../jx-requirements.values.yaml.gotmpl"]
//! ```

use crate::apps::validate_namespace;
use crate::core::HelmplanError;
use crate::utils::get_home_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Chart repository used when neither the application nor the team names one.
pub const DEFAULT_CHART_REPOSITORY: &str = "http://chartmuseum.jenkins-x.io";

/// Timeout in seconds written to `helmDefaults.timeout`.
pub const DEFAULT_HELM_TIMEOUT: u32 = 520;

/// Injected configuration consulted while compiling a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The team's default applications chart repository.
    ///
    /// Used for applications that carry neither a repository nor a prefix
    /// registered in the version stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_apps_repository: Option<String>,

    /// Last-resort chart repository URL, also used for the `jenkins-x`
    /// repository that backs the placeholder release of an empty phase.
    pub default_chart_repository: String,

    /// Namespace fallback when neither the application, the version stream
    /// nor `jx-apps.yml` name one. When unset the current cluster namespace
    /// is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,

    /// Value of `helmDefaults.timeout` in generated helmfiles.
    pub helm_timeout: u32,

    /// Helmfile `bases` entries.
    pub bases: Vec<String>,

    /// Value files appended to the CLI `--values` list for every release.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_values: Vec<String>,

    /// Version stream checkout used when `--version-stream` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_stream: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            team_apps_repository: None,
            default_chart_repository: DEFAULT_CHART_REPOSITORY.to_string(),
            default_namespace: None,
            helm_timeout: DEFAULT_HELM_TIMEOUT,
            bases: vec!["../environments.yaml".to_string()],
            extra_values: Vec::new(),
            version_stream: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional path.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present, otherwise defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`Settings::validate`].
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    tracing::debug!("No settings file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load settings from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Default settings location: `~/.helmplan/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_home_dir()?.join(".helmplan").join("config.toml"))
    }

    /// Check values that would otherwise produce an unusable helmfile.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.default_chart_repository).is_err() {
            return Err(HelmplanError::SettingsError {
                message: format!(
                    "default_chart_repository must be an absolute URL, got '{}'",
                    self.default_chart_repository
                ),
            }
            .into());
        }
        if self.helm_timeout == 0 {
            return Err(HelmplanError::SettingsError {
                message: "helm_timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if let Some(ns) = &self.default_namespace {
            validate_namespace(ns, "settings default_namespace")?;
        }
        Ok(())
    }
}
