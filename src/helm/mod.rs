//! Local Helm repository listing
//!
//! The compiler reuses a repository's existing local alias when the URL an
//! application references is already registered with `helm repo add`.

use crate::core::HelmplanError;
use crate::process::ToolCommand;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Lists the Helm repositories registered on this machine.
pub trait HelmRepoLister {
    /// Registered repositories as `alias -> URL`.
    fn list_repos(&self) -> impl std::future::Future<Output = Result<BTreeMap<String, String>>> + Send;
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    name: String,
    url: String,
}

/// [`HelmRepoLister`] backed by `helm repo list -o json`.
#[derive(Debug, Clone)]
pub struct HelmCli {
    binary: String,
}

impl Default for HelmCli {
    fn default() -> Self {
        Self {
            binary: "helm".to_string(),
        }
    }
}

impl HelmCli {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a differently named helm binary (e.g. `helm3`).
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Parse the JSON array printed by `helm repo list -o json`.
pub fn parse_repo_list(json: &str) -> Result<BTreeMap<String, String>> {
    if json.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let entries: Vec<RepoEntry> =
        serde_json::from_str(json).context("Failed to parse 'helm repo list' output")?;
    Ok(entries.into_iter().map(|e| (e.name, e.url)).collect())
}

impl HelmRepoLister for HelmCli {
    async fn list_repos(&self) -> Result<BTreeMap<String, String>> {
        let result = ToolCommand::new(&self.binary)
            .args(["repo", "list", "-o", "json"])
            .with_context("listing local helm repositories")
            .execute_stdout()
            .await;

        match result {
            Ok(stdout) => {
                let repos = parse_repo_list(&stdout)?;
                tracing::debug!("Found {} local helm repositories", repos.len());
                Ok(repos)
            }
            // helm exits non-zero when nothing has been added yet
            Err(e)
                if matches!(
                    e.downcast_ref::<HelmplanError>(),
                    Some(HelmplanError::ToolCommandError { stderr, .. }) if stderr.contains("no repositories")
                ) =>
            {
                tracing::debug!("No local helm repositories configured");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e).context("Failed listing helm repos"),
        }
    }
}
