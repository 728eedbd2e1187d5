//! In-memory collaborators for driving the compiler without `helm`,
//! `kubectl` or a version stream checkout.

use crate::helm::HelmRepoLister;
use crate::kube::NamespaceLister;
use crate::versionstream::{
    AppDefaults, RepositoryPrefix, RepositoryPrefixes, StableVersion, VersionKind, VersionStream,
};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Version stream held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticVersionStream {
    prefixes: Vec<RepositoryPrefix>,
    versions: HashMap<String, String>,
    defaults: HashMap<String, (AppDefaults, Vec<String>)>,
}

impl StaticVersionStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: &str, urls: &[&str]) -> Self {
        self.prefixes.push(RepositoryPrefix {
            prefix: prefix.to_string(),
            urls: urls.iter().map(|u| (*u).to_string()).collect(),
        });
        self
    }

    /// Pin a chart version.
    #[must_use]
    pub fn with_version(mut self, chart: &str, version: &str) -> Self {
        self.versions.insert(chart.to_string(), version.to_string());
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, chart: &str, defaults: AppDefaults, value_files: &[&str]) -> Self {
        self.defaults.insert(
            chart.to_string(),
            (defaults, value_files.iter().map(|f| (*f).to_string()).collect()),
        );
        self
    }
}

impl VersionStream for StaticVersionStream {
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes> {
        Ok(RepositoryPrefixes::new(self.prefixes.clone()))
    }

    fn stable_version(&self, kind: VersionKind, name: &str) -> Result<Option<StableVersion>> {
        if kind != VersionKind::Chart {
            return Ok(None);
        }
        Ok(self.versions.get(name).map(|v| StableVersion {
            version: Some(v.clone()),
            ..Default::default()
        }))
    }

    fn application_defaults(&self, chart: &str) -> Result<(AppDefaults, Vec<String>)> {
        Ok(self.defaults.get(chart).cloned().unwrap_or_default())
    }
}

/// Fixed set of local helm repositories.
#[derive(Debug, Clone, Default)]
pub struct StaticHelmRepos {
    repos: BTreeMap<String, String>,
}

impl StaticHelmRepos {
    #[must_use]
    pub fn with_repo(mut self, name: &str, url: &str) -> Self {
        self.repos.insert(name.to_string(), url.to_string());
        self
    }
}

impl HelmRepoLister for StaticHelmRepos {
    async fn list_repos(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.repos.clone())
    }
}

/// Fixed cluster namespace snapshot that counts how often it is listed.
#[derive(Debug, Default)]
pub struct StaticNamespaces {
    namespaces: BTreeSet<String>,
    current: String,
    list_calls: AtomicUsize,
}

impl StaticNamespaces {
    pub fn new<I, S>(namespaces: I, current: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            current: current.to_string(),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `list_namespaces` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl NamespaceLister for StaticNamespaces {
    async fn list_namespaces(&self) -> Result<BTreeSet<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.namespaces.clone())
    }

    async fn current_namespace(&self) -> Result<String> {
        Ok(self.current.clone())
    }
}
