//! `helmplan validate`
//!
//! Loads `jx-apps.yml` with the same validation `generate` applies (phase
//! values, namespace names, required fields) and reports release names that
//! collide within a phase. Nothing outside the environment directory is read.

use crate::apps::{AppConfig, Phase};
use crate::core::HelmplanError;
use crate::utils::resolve_path;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Check `jx-apps.yml` without contacting the cluster.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Directory containing jx-apps.yml
    #[arg(long, default_value = ".")]
    dir: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    pub valid: bool,
    /// Application count per phase, before version stream defaults
    pub phases: BTreeMap<String, usize>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a loaded config. Phases are the declared ones; a version
/// stream may still move applications that leave `phase` unset.
pub fn check(config: &AppConfig) -> ValidationResults {
    let mut results = ValidationResults {
        valid: true,
        ..Default::default()
    };
    for phase in Phase::ALL {
        results.phases.insert(phase.to_string(), 0);
    }

    let mut seen: HashSet<(Phase, &str)> = HashSet::new();
    for app in &config.apps {
        let phase = app.effective_phase();
        *results.phases.entry(phase.to_string()).or_default() += 1;

        let release = match app.name.split_once('/') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => local,
            _ => app.name.as_str(),
        };
        if !seen.insert((phase, release)) {
            results.valid = false;
            results.errors.push(
                HelmplanError::DuplicateRelease {
                    name: release.to_string(),
                    phase: phase.to_string(),
                }
                .to_string(),
            );
        }

        if app.namespace.is_none() && config.default_namespace.is_none() {
            results.warnings.push(format!(
                "{} has no namespace and no defaultNamespace is set; it will use the version stream default or the current namespace",
                app.name
            ));
        }
    }
    results
}

impl ValidateCommand {
    pub async fn execute(self) -> Result<()> {
        let dir = resolve_path(&self.dir)?;

        let config = match AppConfig::load(&dir) {
            Ok(config) => config,
            Err(e) => {
                if self.format == OutputFormat::Json {
                    let results = ValidationResults {
                        valid: false,
                        errors: vec![format!("{e:#}")],
                        ..Default::default()
                    };
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    println!("{} {}", "✗".red(), e);
                }
                return Err(e);
            }
        };

        let results = check(&config);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => {
                for warning in &results.warnings {
                    println!("{} Warning: {warning}", "⚠".yellow());
                }
                for error in &results.errors {
                    println!("{} {error}", "✗".red());
                }
                if results.valid {
                    println!("{} Valid jx-apps.yml", "✓".green());
                    for (phase, count) in &results.phases {
                        println!("  {phase}: {count} application(s)");
                    }
                }
            }
        }

        if results.valid {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Validation failed with {} error(s)", results.errors.len()))
        }
    }
}
