//! Cluster namespace lookups through `kubectl`
//!
//! Only read operations are performed: listing namespaces and reading the
//! namespace of the current context.

use crate::apps::validate_namespace;
use crate::process::ToolCommand;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Namespace used when the kube context does not set one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Read-only view of the cluster's namespaces.
pub trait NamespaceLister {
    /// Names of all namespaces that currently exist.
    fn list_namespaces(&self) -> impl std::future::Future<Output = Result<BTreeSet<String>>> + Send;

    /// Namespace of the active kube context.
    fn current_namespace(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct NamespaceList {
    #[serde(default)]
    items: Vec<NamespaceItem>,
}

#[derive(Debug, Deserialize)]
struct NamespaceItem {
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    name: String,
}

/// [`NamespaceLister`] backed by the `kubectl` binary.
#[derive(Debug, Clone, Default)]
pub struct Kubectl {
    context: Option<String>,
    namespace: Option<String>,
}

impl Kubectl {
    /// Use the given kube context instead of the current one.
    pub fn new(context: Option<String>) -> Self {
        Self {
            context: context.filter(|c| !c.is_empty()),
            namespace: None,
        }
    }

    /// Report this namespace as current instead of asking the kube context.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new("kubectl")
    }

    fn with_context_flag(&self, cmd: ToolCommand) -> ToolCommand {
        match &self.context {
            Some(ctx) => cmd.args(["--context", ctx.as_str()]),
            None => cmd,
        }
    }
}

/// Parse `kubectl get namespaces -o json`.
pub fn parse_namespace_list(json: &str) -> Result<BTreeSet<String>> {
    let list: NamespaceList =
        serde_json::from_str(json).context("Failed to parse 'kubectl get namespaces' output")?;
    Ok(list.items.into_iter().map(|item| item.metadata.name).collect())
}

impl NamespaceLister for Kubectl {
    async fn list_namespaces(&self) -> Result<BTreeSet<String>> {
        let cmd = self.command().args(["get", "namespaces", "-o", "json"]);
        let stdout = self
            .with_context_flag(cmd)
            .with_context("listing namespaces")
            .execute_stdout()
            .await
            .context("Failed to list namespaces")?;

        let namespaces = parse_namespace_list(&stdout)?;
        tracing::debug!("Cluster has {} namespaces", namespaces.len());
        Ok(namespaces)
    }

    async fn current_namespace(&self) -> Result<String> {
        if let Some(ns) = &self.namespace {
            validate_namespace(ns, "--namespace")?;
            return Ok(ns.clone());
        }
        let cmd = self.command().args(["config", "view", "--minify", "-o", "jsonpath={..namespace}"]);
        let stdout = self
            .with_context_flag(cmd)
            .with_context("reading current namespace")
            .execute_stdout()
            .await
            .context("Failed to read the current kube namespace")?;

        if stdout.is_empty() {
            return Ok(DEFAULT_NAMESPACE.to_string());
        }
        validate_namespace(&stdout, "the current kube context")?;
        Ok(stdout)
    }
}
