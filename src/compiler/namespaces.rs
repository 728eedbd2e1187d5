//! Namespace-creator injection.
//!
//! Helm will not create a release's namespace, so every namespace a phase
//! targets that is missing from the cluster gets one synthetic
//! `namespace-<ns>` release (chart `zloeber/namespace`), and each release in
//! that namespace `needs` it.

use crate::apps::Phase;
use crate::core::HelmplanError;
use crate::helmfile::{GeneratedValues, ReleaseSpec, RepositorySpec};
use crate::utils::fs::{remove_dir_all, safe_write};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use super::repository::RepositorySet;

pub const NAMESPACE_REPOSITORY_NAME: &str = "zloeber";
pub const NAMESPACE_REPOSITORY_URL: &str = "git+https://github.com/zloeber/helm-namespace@chart";
pub const NAMESPACE_CHART: &str = "zloeber/namespace";
pub const GENERATED_DIR: &str = "generated";

/// Directory holding generated values files for a phase.
pub fn generated_dir(output_dir: &Path, phase: Phase) -> PathBuf {
    output_dir.join(phase.as_str()).join(GENERATED_DIR)
}

/// Delete the generated values left over from a previous run.
pub fn clear_generated(output_dir: &Path, phase: Phase) -> Result<()> {
    let dir = generated_dir(output_dir, phase);
    remove_dir_all(&dir)
        .with_context(|| format!("Cannot delete generated values directory {}", dir.display()))
}

/// Values file a namespace-creator release reads, relative to the phase directory.
pub fn generated_values_file(namespace: &str) -> String {
    format!("{GENERATED_DIR}/{namespace}/values.yaml")
}

/// Add namespace-creator releases for namespaces missing from `existing`.
///
/// Synthetic releases are appended after the declared ones, one per
/// namespace. Releases with an empty namespace are skipped. Returns the
/// namespaces that need a generated values file, in first-use order.
pub fn inject_namespaces(
    phase: Phase,
    existing: &BTreeSet<String>,
    current_namespace: &str,
    releases: &mut Vec<ReleaseSpec>,
    repositories: &mut RepositorySet,
) -> Vec<String> {
    let mut synthesized = Vec::new();
    let mut creators = Vec::new();

    for release in releases.iter_mut() {
        let namespace = release.namespace.clone();
        if namespace.is_empty() || existing.contains(&namespace) {
            continue;
        }

        let creator = format!("namespace-{namespace}");
        if !synthesized.contains(&namespace) {
            repositories.insert(RepositorySpec::new(NAMESPACE_REPOSITORY_NAME, NAMESPACE_REPOSITORY_URL));
            creators.push(ReleaseSpec {
                name: creator.clone(),
                namespace: current_namespace.to_string(),
                chart: NAMESPACE_CHART.to_string(),
                version: None,
                values: vec![generated_values_file(&namespace)],
                needs: Vec::new(),
            });
            tracing::debug!("Namespace {} does not exist, adding {}", namespace, creator);
            synthesized.push(namespace);
        }

        release.needs = vec![format!("{current_namespace}/{creator}")];
    }

    if !synthesized.is_empty() {
        tracing::info!(
            "{} phase: creating {} missing namespace(s): {}",
            phase,
            synthesized.len(),
            synthesized.join(", ")
        );
    }
    releases.extend(creators);
    synthesized
}

/// Replace the phase's generated directory with one values file per namespace.
pub fn write_generated(output_dir: &Path, phase: Phase, namespaces: &[String]) -> Result<()> {
    clear_generated(output_dir, phase)?;
    for namespace in namespaces {
        write_generated_values(output_dir, phase, namespace)?;
    }
    Ok(())
}

/// Write `<output>/<phase>/generated/<ns>/values.yaml`.
fn write_generated_values(output_dir: &Path, phase: Phase, namespace: &str) -> Result<()> {
    let mut components = Path::new(namespace).components();
    if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
        return Err(HelmplanError::InvalidNamespace {
            namespace: namespace.to_string(),
            origin: "a generated values path".to_string(),
        }
        .into());
    }

    let path = generated_dir(output_dir, phase).join(namespace).join("values.yaml");
    let values = GeneratedValues {
        namespaces: vec![namespace.to_string()],
    };
    let content = serde_yaml::to_string(&values).context("Failed to serialize namespace values")?;
    safe_write(&path, &content)
        .with_context(|| format!("Failed to write generated namespace values file {}", path.display()))
}
