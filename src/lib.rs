//! helmplan - compile `jx-apps.yml` into phase-partitioned helmfiles
//!
//! A GitOps environment repository lists its Helm applications in
//! `jx-apps.yml`. helmplan resolves each application against a version
//! stream, the local Helm repository configuration and the live cluster,
//! then writes one `helmfile.yaml` per installation phase:
//!
//! ```text
//! <output>/system/helmfile.yaml   # cluster-level prerequisites
//! <output>/apps/helmfile.yaml     # everything else
//! ```
//!
//! # Pipeline
//!
//! 1. [`apps`] parses and validates `jx-apps.yml`
//! 2. [`versionstream`] supplies repository prefixes, pinned versions and
//!    per-chart defaults
//! 3. [`compiler`] resolves charts, repository aliases, versions and value
//!    files, injects namespace-creating releases, and hands each phase to
//!    the writer
//! 4. [`helmfile`] is the serialized output model
//!
//! External state is read through [`helm`] (`helm repo list`) and [`kube`]
//! (`kubectl get namespaces`), both built on [`process`].
//!
//! # Supporting Modules
//!
//! - [`cli`] - `generate` and `validate` subcommands
//! - [`config`] - `~/.helmplan/config.toml` settings
//! - [`core`] - Error types and user-facing error rendering
//! - [`utils`] - Atomic file writes and path expansion

pub mod apps;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod helm;
pub mod helmfile;
pub mod kube;
pub mod process;
pub mod utils;
pub mod versionstream;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
