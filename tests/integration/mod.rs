//! Integration test suite for helmplan
//!
//! Library-level tests drive [`PlanCompiler`](helmplan_cli::compiler::PlanCompiler)
//! with the in-memory collaborators from `helmplan_cli::test_utils`; CLI
//! tests run the `helmplan` binary against temporary environment
//! directories. None of them need `helm`, `kubectl` or a cluster.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `generate` and `validate` through the binary
//! - **namespaces**: Namespace-creator injection and generated values
//! - **phases**: Phase partitioning, placeholders and output layout
//! - **repositories**: Repository alias assignment and dedup
//! - **values**: Values file precedence
//! - **version_stream**: Compilation against an on-disk version stream

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod phases;
mod values;
mod version_stream;

use helmplan_cli::apps::{AppConfig, Phase};
use helmplan_cli::compiler::{CompileOptions, PlanCompiler};
use helmplan_cli::config::Settings;
use helmplan_cli::helmfile::HelmState;
use helmplan_cli::test_utils::{StaticHelmRepos, StaticNamespaces, StaticVersionStream};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Compile `yaml` with default settings and no local helm repositories.
pub(crate) async fn compile_yaml(
    yaml: &str,
    stream: &StaticVersionStream,
    kube: &StaticNamespaces,
    options: &CompileOptions,
) -> anyhow::Result<BTreeMap<Phase, HelmState>> {
    let config = AppConfig::parse(yaml, "jx-apps.yml")?;
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    PlanCompiler::new(&settings, stream, &helm, kube, options).compile(&config).await
}

/// Like [`compile_yaml`], but writes the helmfiles and generated values.
pub(crate) async fn generate_yaml(
    yaml: &str,
    stream: &StaticVersionStream,
    kube: &StaticNamespaces,
    options: &CompileOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    let config = AppConfig::parse(yaml, "jx-apps.yml")?;
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    PlanCompiler::new(&settings, stream, &helm, kube, options).generate(&config).await
}
