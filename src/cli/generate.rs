//! `helmplan generate`

use crate::apps::AppConfig;
use crate::compiler::{CompileOptions, PlanCompiler};
use crate::config::Settings;
use crate::helm::HelmCli;
use crate::kube::Kubectl;
use crate::utils::resolve_path;
use crate::versionstream::VersionStreamDir;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Environment variable naming an extra secrets values file.
pub const SECRETS_YAML_ENV: &str = "JX_SECRETS_YAML";

/// Compile `jx-apps.yml` and write one helmfile per phase.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Directory containing jx-apps.yml and local value overrides
    #[arg(long, default_value = ".")]
    dir: String,

    /// Directory the <phase>/helmfile.yaml files are written under [default: --dir]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Values file applied to every release (repeatable)
    #[arg(long = "values", value_name = "FILE")]
    values: Vec<String>,

    /// Version stream checkout used to pin chart versions
    #[arg(long, value_name = "DIR")]
    version_stream: Option<String>,

    /// Namespace to treat as current instead of the kube context's
    #[arg(long)]
    namespace: Option<String>,

    /// Kube context used for namespace lookups
    #[arg(long)]
    kube_context: Option<String>,
}

impl GenerateCommand {
    /// Global values: `--values`, then the file named by `JX_SECRETS_YAML`.
    fn global_values(&self) -> Vec<String> {
        let mut values = self.values.clone();
        if let Ok(secrets) = std::env::var(SECRETS_YAML_ENV)
            && !secrets.trim().is_empty()
        {
            tracing::debug!("Adding secrets values from ${}", SECRETS_YAML_ENV);
            values.push(secrets);
        }
        values
    }

    pub async fn execute(self, config_path: Option<String>) -> Result<()> {
        let config_path = config_path.as_deref().map(resolve_path).transpose()?;
        let settings = Settings::load_with_optional(config_path).await?;

        let dir = resolve_path(&self.dir)?;
        let output_dir = match &self.output_dir {
            Some(out) => resolve_path(out)?,
            None => dir.clone(),
        };

        let apps = AppConfig::load(&dir).context("Failed to load applications")?;

        let stream_path: Option<PathBuf> = self
            .version_stream
            .as_deref()
            .or(settings.version_stream.as_deref())
            .map(resolve_path)
            .transpose()?;
        let stream = match stream_path {
            Some(path) => {
                if !path.is_dir() {
                    anyhow::bail!("Version stream directory does not exist: {}", path.display());
                }
                Some(VersionStreamDir::new(path))
            }
            None => {
                tracing::warn!("No version stream configured, chart versions will not be pinned");
                None
            }
        };

        let options = CompileOptions::new(dir, output_dir).with_values(self.global_values());
        let helm = HelmCli::new();
        let kube = Kubectl::new(self.kube_context.clone()).with_namespace(self.namespace.clone());

        let compiler = PlanCompiler::new(&settings, &stream, &helm, &kube, &options);
        let written = compiler.generate(&apps).await?;

        for path in written {
            println!("{} Generated {}", "✓".green(), path.display());
        }
        Ok(())
    }
}
