//! Temporary directories laid out like an environment repository or a
//! version stream checkout.

use crate::apps::{APPS_FILE, Phase};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// An environment directory holding `jx-apps.yml` and local value overrides.
pub struct EnvFixture {
    temp: TempDir,
}

impl EnvFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `jx-apps.yml`.
    pub fn with_apps(self, yaml: &str) -> Result<Self> {
        write_file(self.path(), APPS_FILE, yaml)?;
        Ok(self)
    }

    /// Write `<phase>/<app>/<file>`.
    pub fn with_local_values(self, phase: Phase, app: &str, file: &str) -> Result<Self> {
        write_file(self.path(), &format!("{phase}/{app}/{file}"), "# local override\n")?;
        Ok(self)
    }

    /// Write an arbitrary file relative to the environment root.
    pub fn with_file(self, rel: &str, content: &str) -> Result<Self> {
        write_file(self.path(), rel, content)?;
        Ok(self)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path().join(rel);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// A version stream checkout.
pub struct VersionStreamFixture {
    temp: TempDir,
    prefixes: Vec<(String, Vec<String>)>,
}

impl VersionStreamFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp dir")?,
            prefixes: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Register a prefix in `charts/repositories.yml`.
    pub fn with_prefix(mut self, prefix: &str, urls: &[&str]) -> Result<Self> {
        self.prefixes.push((prefix.to_string(), urls.iter().map(|u| (*u).to_string()).collect()));
        let mut yaml = String::from("repositories:\n");
        for (prefix, urls) in &self.prefixes {
            yaml.push_str(&format!("- prefix: {prefix}\n  urls:\n"));
            for url in urls {
                yaml.push_str(&format!("  - {url}\n"));
            }
        }
        write_file(self.path(), "charts/repositories.yml", &yaml)?;
        Ok(self)
    }

    /// Pin `charts/<chart>.yml`.
    pub fn with_version(self, chart: &str, version: &str) -> Result<Self> {
        write_file(self.path(), &format!("charts/{chart}.yml"), &format!("version: {version}\n"))?;
        Ok(self)
    }

    /// Write `apps/<chart>/defaults.yml`.
    pub fn with_defaults(self, chart: &str, yaml: &str) -> Result<Self> {
        write_file(self.path(), &format!("apps/{chart}/defaults.yml"), yaml)?;
        Ok(self)
    }

    /// Write `apps/<chart>/<file>`.
    pub fn with_app_file(self, chart: &str, file: &str) -> Result<Self> {
        write_file(self.path(), &format!("apps/{chart}/{file}"), "# version stream default\n")?;
        Ok(self)
    }
}
