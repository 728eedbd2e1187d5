//! Command-line interface for helmplan
//!
//! # Commands
//!
//! - `generate` - Compile `jx-apps.yml` into `system/helmfile.yaml` and `apps/helmfile.yaml`
//! - `validate` - Check `jx-apps.yml` without contacting the cluster
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: settings file (default `~/.helmplan/config.toml`)
//!
//! Without `--verbose` or `--quiet`, `RUST_LOG` is honored and defaults to `info`.

mod generate;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use generate::GenerateCommand;
pub use validate::{OutputFormat, ValidateCommand};

/// Options derived from the global flags, applied before a command runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit log filter; `None` defers to `RUST_LOG`, then `info`
    pub log_level: Option<String>,
    /// Settings file given with `--config`
    pub config_path: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter the subscriber will be installed with.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// A second call is a no-op.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "helmplan",
    about = "Compile jx-apps.yml into phase-partitioned helmfiles",
    version,
    author,
    long_about = "helmplan resolves the applications listed in jx-apps.yml against a version stream, \
                  local Helm repositories and the live cluster, and writes one helmfile per \
                  installation phase (system, then apps)."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the settings file
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate system/helmfile.yaml and apps/helmfile.yaml
    Generate(GenerateCommand),

    /// Validate jx-apps.yml
    Validate(ValidateCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Generate(cmd) => cmd.execute(config.config_path).await,
            Commands::Validate(cmd) => cmd.execute().await,
        }
    }
}
