//! Release plan compiler
//!
//! Turns an [`AppConfig`] into one [`HelmState`] per [`Phase`]. For every
//! application it resolves the chart, the repository alias, the version and
//! the values files; then, per phase, it injects namespace-creator releases
//! for namespaces the cluster does not have yet and sorts repositories by
//! name.
//!
//! Repository aliases are assigned in declaration order across all phases,
//! so the first application to reference a repository URL decides its
//! alias. [`PlanCompiler::plan`] has no side effects; only
//! [`PlanCompiler::generate`] writes, once every phase has compiled.
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmplan_cli::apps::AppConfig;
//! use helmplan_cli::compiler::{CompileOptions, PlanCompiler};
//! use helmplan_cli::config::Settings;
//! use helmplan_cli::helm::HelmCli;
//! use helmplan_cli::kube::Kubectl;
//! use helmplan_cli::versionstream::VersionStreamDir;
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dir = PathBuf::from("env");
//! let config = AppConfig::load(&dir)?;
//! let settings = Settings::default();
//! let stream = Some(VersionStreamDir::new("versions"));
//! let options = CompileOptions::new(dir.clone(), dir);
//!
//! let helm = HelmCli::new();
//! let kubectl = Kubectl::default();
//! let compiler = PlanCompiler::new(&settings, &stream, &helm, &kubectl, &options);
//! for path in compiler.generate(&config).await? {
//!     println!("wrote {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod namespaces;
pub mod repository;
pub mod values;
pub mod version;
pub mod writer;

pub use chart::{ChartDetails, resolve_chart};
pub use writer::{HELMFILE_NAME, helmfile_path, write_helmfile};

use crate::apps::{App, AppConfig, Phase};
use crate::config::Settings;
use crate::core::HelmplanError;
use crate::helm::HelmRepoLister;
use crate::helmfile::{HelmSpec, HelmState, ReleaseSpec, RepositorySpec};
use crate::kube::NamespaceLister;
use crate::versionstream::{RepositoryPrefixes, VersionStream};
use anyhow::{Context, Result};
use repository::{RepositoryResolver, RepositorySet};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Release and repository used when a phase has no applications, so that
/// `helmfile sync` still has something to do.
pub const EMPTY_RELEASE_NAME: &str = "empty";
pub const EMPTY_RELEASE_CHART: &str = "jenkins-x/empty";
pub const EMPTY_RELEASE_REPOSITORY: &str = "jenkins-x";

/// Per-run inputs that are not part of `jx-apps.yml`.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Environment directory holding `jx-apps.yml` and local value overrides
    pub dir: PathBuf,
    /// Root the `<phase>/helmfile.yaml` files are written under
    pub output_dir: PathBuf,
    /// Value files applied to every release
    pub values: Vec<String>,
}

impl CompileOptions {
    pub fn new(dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            output_dir: output_dir.into(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }
}

/// An application with version stream defaults applied and its chart resolved.
#[derive(Debug, Clone)]
struct PlannedApp {
    app: App,
    phase: Phase,
    details: ChartDetails,
    /// Repository alias; `None` for filesystem charts
    alias: Option<String>,
    /// Explicit value files followed by version stream value files
    values: Vec<String>,
}

/// A compiled phase and the namespaces whose creator values files still
/// have to be written next to its helmfile.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePlan {
    pub state: HelmState,
    pub generated_namespaces: Vec<String>,
}

/// Compiles applications into per-phase helmfiles.
pub struct PlanCompiler<'a, S, H, K> {
    settings: &'a Settings,
    stream: &'a S,
    helm: &'a H,
    kube: &'a K,
    options: &'a CompileOptions,
}

impl<'a, S, H, K> PlanCompiler<'a, S, H, K>
where
    S: VersionStream,
    H: HelmRepoLister,
    K: NamespaceLister,
{
    pub const fn new(
        settings: &'a Settings,
        stream: &'a S,
        helm: &'a H,
        kube: &'a K,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            settings,
            stream,
            helm,
            kube,
            options,
        }
    }

    /// Compile every phase without touching the output directory.
    ///
    /// Both phases are always present in the result.
    pub async fn plan(&self, config: &AppConfig) -> Result<BTreeMap<Phase, PhasePlan>> {
        let prefixes = self.stream.repository_prefixes().context("Failed to load repository prefixes")?;
        let local_repos = self.helm.list_repos().await?;
        let current_namespace = self.kube.current_namespace().await?;
        tracing::debug!("Current namespace is {}", current_namespace);

        let mut resolver = RepositoryResolver::new(&local_repos, &prefixes);
        let mut by_phase: BTreeMap<Phase, Vec<PlannedApp>> =
            Phase::ALL.into_iter().map(|p| (p, Vec::new())).collect();
        for app in &config.apps {
            let mut planned = self
                .plan_app(app, &prefixes)
                .with_context(|| format!("Failed to resolve chart details for {} repository {}", app.name, app.repository))?;
            planned.alias = resolver.resolve(&planned.details);
            by_phase.entry(planned.phase).or_default().push(planned);
        }

        let default_namespace = config
            .default_namespace
            .clone()
            .or_else(|| self.settings.default_namespace.clone())
            .unwrap_or_else(|| current_namespace.clone());

        let mut plans = BTreeMap::new();
        for (phase, apps) in by_phase {
            let plan = self
                .compile_phase(phase, &apps, config, &default_namespace, &current_namespace)
                .await
                .with_context(|| format!("Failed to generate {phase} helmfile"))?;
            plans.insert(phase, plan);
        }
        Ok(plans)
    }

    /// Compile every phase and keep only the helmfile states.
    pub async fn compile(&self, config: &AppConfig) -> Result<BTreeMap<Phase, HelmState>> {
        Ok(self.plan(config).await?.into_iter().map(|(phase, plan)| (phase, plan.state)).collect())
    }

    /// Compile, then write the generated values and
    /// `<output_dir>/<phase>/helmfile.yaml` for every phase. Nothing is
    /// written unless every phase compiles. Returns the helmfile paths in
    /// phase order.
    pub async fn generate(&self, config: &AppConfig) -> Result<Vec<PathBuf>> {
        let plans = self.plan(config).await?;
        let mut written = Vec::with_capacity(plans.len());
        for (phase, plan) in &plans {
            namespaces::write_generated(&self.options.output_dir, *phase, &plan.generated_namespaces)?;
            let path = write_helmfile(&plan.state, &self.options.output_dir, *phase)?;
            tracing::info!(
                "Wrote {} ({} releases, {} repositories)",
                path.display(),
                plan.state.releases.len(),
                plan.state.repositories.len()
            );
            written.push(path);
        }
        Ok(written)
    }

    fn plan_app(&self, app: &App, prefixes: &RepositoryPrefixes) -> Result<PlannedApp> {
        let details = resolve_chart(&app.name, &app.repository, prefixes, self.settings)?;
        let (defaults, stream_values) = self.stream.application_defaults(&details.name)?;

        let mut app = app.clone();
        if app.namespace.is_none() {
            app.namespace = defaults.namespace;
        }
        if app.phase.is_none() {
            app.phase = defaults.phase;
        }
        let phase = app.effective_phase();

        let values = app.value_files.iter().cloned().chain(stream_values).collect();
        tracing::debug!("Application {} goes to the {} phase as chart {}", app.name, phase, details.name);

        Ok(PlannedApp {
            app,
            phase,
            details,
            alias: None,
            values,
        })
    }

    async fn compile_phase(
        &self,
        phase: Phase,
        apps: &[PlannedApp],
        config: &AppConfig,
        default_namespace: &str,
        current_namespace: &str,
    ) -> Result<PhasePlan> {
        let mut repositories = RepositorySet::default();
        let mut releases = Vec::with_capacity(apps.len());
        let mut names = HashSet::new();
        let cli_values: Vec<String> =
            self.options.values.iter().chain(&self.settings.extra_values).cloned().collect();

        for planned in apps {
            let details = &planned.details;
            if !names.insert(details.local_name.clone()) {
                return Err(HelmplanError::DuplicateRelease {
                    name: details.local_name.clone(),
                    phase: phase.to_string(),
                }
                .into());
            }

            let chart = match &planned.alias {
                Some(alias) => {
                    repositories.insert(RepositorySpec::new(alias, &details.repository));
                    format!("{alias}/{}", details.local_name)
                }
                None => details.name.clone(),
            };

            let version = version::resolve_version(planned.app.version.as_deref(), &details.name, self.stream)?;

            let values = values::resolve_values(
                &planned.values,
                &cli_values,
                &self.options.dir,
                phase,
                &planned.app.name,
            );

            releases.push(ReleaseSpec {
                name: details.local_name.clone(),
                namespace: planned.app.namespace.clone().unwrap_or_else(|| default_namespace.to_string()),
                chart,
                version,
                values,
                needs: Vec::new(),
            });
        }

        for extra in &config.repositories {
            if repositories.insert(extra.clone()) {
                tracing::debug!("Added repository {} from jx-apps.yml", extra.name);
            }
        }

        if releases.is_empty() {
            tracing::debug!("No applications in the {} phase, adding placeholder release", phase);
            let default_url = &self.settings.default_chart_repository;
            let chart = match repositories.name_for_url(default_url).map(str::to_string) {
                Some(alias) => format!("{alias}/{EMPTY_RELEASE_NAME}"),
                None => {
                    if !repositories.contains_name(EMPTY_RELEASE_REPOSITORY) {
                        repositories.insert(RepositorySpec::new(EMPTY_RELEASE_REPOSITORY, default_url));
                    }
                    EMPTY_RELEASE_CHART.to_string()
                }
            };
            releases.push(ReleaseSpec {
                name: EMPTY_RELEASE_NAME.to_string(),
                namespace: default_namespace.to_string(),
                chart,
                ..Default::default()
            });
        }

        let existing = self.kube.list_namespaces().await.context("Failed to check namespaces exist")?;
        let generated_namespaces = namespaces::inject_namespaces(
            phase,
            &existing,
            current_namespace,
            &mut releases,
            &mut repositories,
        );

        Ok(PhasePlan {
            state: HelmState {
                bases: self.settings.bases.clone(),
                helm_defaults: HelmSpec::with_timeout(self.settings.helm_timeout),
                repositories: repositories.into_sorted(),
                releases,
            },
            generated_namespaces,
        })
    }
}
