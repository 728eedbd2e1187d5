//! Helmfile document model
//!
//! Field order on these structs is the key order of the serialized YAML, so
//! it matches the layout `helmfile` users expect: `bases`, `helmDefaults`,
//! `repositories`, `releases`.

use serde::{Deserialize, Serialize};

/// Root of one phase's `helmfile.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmState {
    /// Base files layered underneath this helmfile
    #[serde(default)]
    pub bases: Vec<String>,
    /// Defaults applied to every release
    pub helm_defaults: HelmSpec,
    /// Chart repositories, one per distinct URL, sorted by name
    #[serde(default)]
    pub repositories: Vec<RepositorySpec>,
    /// Releases in declaration order, synthetic releases last
    #[serde(default)]
    pub releases: Vec<ReleaseSpec>,
}

/// `helmDefaults` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmSpec {
    pub atomic: bool,
    pub verify: bool,
    pub wait: bool,
    pub timeout: u32,
    /// Always false, see helm/helm#6378
    pub force: bool,
}

impl HelmSpec {
    /// The defaults every generated helmfile carries, with the given timeout.
    #[must_use]
    pub const fn with_timeout(timeout: u32) -> Self {
        Self {
            atomic: true,
            verify: false,
            wait: true,
            timeout,
            force: false,
        }
    }
}

/// A chart repository alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositorySpec {
    pub name: String,
    pub url: String,
}

impl RepositorySpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One Helm release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSpec {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub chart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// `<namespace>/<release>` references installed before this release
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,
}

/// Values file handed to the namespace-creator chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedValues {
    pub namespaces: Vec<String>,
}
