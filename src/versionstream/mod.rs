//! Version stream access
//!
//! A version stream is a directory (usually a git checkout) of pinned chart
//! versions and per-application defaults:
//!
//! ```text
//! <stream>/charts/repositories.yml              # repositories: [{prefix, urls}]
//! <stream>/charts/<prefix>/<name>.yml           # version, upperLimit, gitUrl, ...
//! <stream>/apps/<prefix>/<name>/defaults.yml    # namespace, phase, valueFiles
//! <stream>/apps/<prefix>/<name>/values.yaml(.gotmpl)
//! ```
//!
//! The compiler only sees the [`VersionStream`] trait. [`VersionStreamDir`]
//! reads a checkout from disk, and `Option<S>` stands in for "no version
//! stream configured", answering every lookup with a miss.

mod dir;

pub use dir::VersionStreamDir;

use crate::apps::Phase;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Category of pinned artifact, also the top-level directory it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKind {
    Chart,
    Package,
    Docker,
}

impl VersionKind {
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Chart => "charts",
            Self::Package => "packages",
            Self::Docker => "docker",
        }
    }
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Pinned version record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StableVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Exclusive upper bound for compatible versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Defaults an application inherits when `jx-apps.yml` leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDefaults {
    pub namespace: Option<String>,
    pub phase: Option<Phase>,
}

/// One `{prefix, urls}` entry of `charts/repositories.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPrefix {
    pub prefix: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Chart repository prefixes registered in the version stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPrefixes {
    entries: Vec<RepositoryPrefix>,
    url_to_prefix: HashMap<String, String>,
    prefix_to_urls: HashMap<String, Vec<String>>,
}

impl RepositoryPrefixes {
    /// Index the entries. When a URL is listed under several prefixes the
    /// last one wins.
    #[must_use]
    pub fn new(entries: Vec<RepositoryPrefix>) -> Self {
        let mut url_to_prefix = HashMap::new();
        let mut prefix_to_urls = HashMap::new();
        for entry in &entries {
            for url in &entry.urls {
                url_to_prefix.insert(url.clone(), entry.prefix.clone());
            }
            prefix_to_urls.insert(entry.prefix.clone(), entry.urls.clone());
        }
        Self {
            entries,
            url_to_prefix,
            prefix_to_urls,
        }
    }

    /// Prefix registered for a repository URL.
    #[must_use]
    pub fn prefix_for_url(&self, url: &str) -> Option<&str> {
        self.url_to_prefix.get(url).map(String::as_str)
    }

    /// URLs registered for a prefix, in file order.
    #[must_use]
    pub fn urls_for_prefix(&self, prefix: &str) -> &[String] {
        self.prefix_to_urls.get(prefix).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn entries(&self) -> &[RepositoryPrefix] {
        &self.entries
    }
}

/// Read-only view of a version stream.
pub trait VersionStream {
    /// Repository prefix table from `charts/repositories.yml`.
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes>;

    /// Pinned version for `name`. A missing record or one without a
    /// `version` is `Ok(None)`.
    fn stable_version(&self, kind: VersionKind, name: &str) -> Result<Option<StableVersion>>;

    /// Application defaults for a fully qualified chart name, plus the value
    /// files the version stream registers for it in precedence order.
    fn application_defaults(&self, chart: &str) -> Result<(AppDefaults, Vec<String>)>;
}

impl<S: VersionStream> VersionStream for Option<S> {
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes> {
        match self {
            Some(stream) => stream.repository_prefixes(),
            None => Ok(RepositoryPrefixes::default()),
        }
    }

    fn stable_version(&self, kind: VersionKind, name: &str) -> Result<Option<StableVersion>> {
        match self {
            Some(stream) => stream.stable_version(kind, name),
            None => Ok(None),
        }
    }

    fn application_defaults(&self, chart: &str) -> Result<(AppDefaults, Vec<String>)> {
        match self {
            Some(stream) => stream.application_defaults(chart),
            None => Ok((AppDefaults::default(), Vec::new())),
        }
    }
}
