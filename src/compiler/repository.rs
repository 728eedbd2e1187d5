//! Repository alias assignment.
//!
//! One [`RepositoryResolver`] lives for a whole compilation, so a URL keeps
//! the alias it was first given across applications and phases.

use super::chart::ChartDetails;
use crate::helmfile::RepositorySpec;
use crate::versionstream::RepositoryPrefixes;
use std::collections::{BTreeMap, HashMap};

pub struct RepositoryResolver<'a> {
    local_repos: &'a BTreeMap<String, String>,
    prefixes: &'a RepositoryPrefixes,
    /// URL -> alias, first writer wins
    aliases: HashMap<String, String>,
    /// alias -> URL, to keep aliases unique
    owners: HashMap<String, String>,
}

impl<'a> RepositoryResolver<'a> {
    pub fn new(local_repos: &'a BTreeMap<String, String>, prefixes: &'a RepositoryPrefixes) -> Self {
        Self {
            local_repos,
            prefixes,
            aliases: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Alias for the chart's repository, or `None` for filesystem charts.
    ///
    /// Candidates in order: a local helm repository with the same URL
    /// (alphabetically first name), the version stream prefix for the URL,
    /// the chart's own prefix, a random UUID. A candidate already owned by
    /// a different URL is skipped.
    pub fn resolve(&mut self, details: &ChartDetails) -> Option<String> {
        if !details.is_remote() {
            return None;
        }
        let url = details.repository.as_str();
        if let Some(alias) = self.aliases.get(url) {
            return Some(alias.clone());
        }

        let local = self.local_repos.iter().find(|(_, u)| u.as_str() == url).map(|(name, _)| name.clone());
        let registered = self.prefixes.prefix_for_url(url).map(str::to_string);
        let own = Some(details.prefix.clone()).filter(|p| !p.is_empty());

        let alias = [local, registered, own]
            .into_iter()
            .flatten()
            .find(|candidate| self.owners.get(candidate).is_none_or(|owner| owner == url))
            .unwrap_or_else(|| {
                let generated = uuid::Uuid::new_v4().to_string();
                tracing::debug!("No known alias for {}, generated {}", url, generated);
                generated
            });

        self.aliases.insert(url.to_string(), alias.clone());
        self.owners.insert(alias.clone(), url.to_string());
        Some(alias)
    }
}

/// Repositories used by one phase, one entry per URL in first-use order.
#[derive(Debug, Default)]
pub struct RepositorySet {
    specs: Vec<RepositorySpec>,
}

impl RepositorySet {
    /// Add a repository unless its URL is already present. Returns whether it was added.
    pub fn insert(&mut self, spec: RepositorySpec) -> bool {
        if self.name_for_url(&spec.url).is_some() {
            return false;
        }
        self.specs.push(spec);
        true
    }

    /// Alias already registered for `url`, if any.
    pub fn name_for_url(&self, url: &str) -> Option<&str> {
        self.specs.iter().find(|r| r.url == url).map(|r| r.name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.specs.iter().any(|r| r.name == name)
    }

    /// Repositories sorted by alias.
    pub fn into_sorted(mut self) -> Vec<RepositorySpec> {
        self.specs.sort_by(|a, b| a.name.cmp(&b.name));
        self.specs
    }
}
