//! Common test utilities for helmplan integration tests
//!
//! [`TestProject`] owns an environment directory and an isolated `HOME` so
//! that a developer's `~/.helmplan/config.toml` never leaks into a test run.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test environment repository driven through the `helmplan` binary
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    env_dir: PathBuf,
    home_dir: PathBuf,
}

impl TestProject {
    /// Create an empty environment directory with its own home directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let env_dir = temp_dir.path().join("env");
        let home_dir = temp_dir.path().join("home");

        fs::create_dir_all(&env_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            env_dir,
            home_dir,
        })
    }

    /// Get the environment directory path
    pub fn env_path(&self) -> &Path {
        &self.env_dir
    }

    /// Get the isolated home directory path
    pub fn home_path(&self) -> &Path {
        &self.home_dir
    }

    /// Write `jx-apps.yml` to the environment directory
    pub fn write_apps(&self, content: &str) -> Result<()> {
        self.write_file("jx-apps.yml", content)
    }

    /// Write a file relative to the environment directory
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.env_dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
        Ok(())
    }

    /// Run helmplan in the environment directory
    pub fn run_helmplan(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run_helmplan_with_env(args, &[])
    }

    /// Run helmplan with extra environment variables
    pub fn run_helmplan_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let helmplan_binary = env!("CARGO_BIN_EXE_helmplan");
        let output = Command::new(helmplan_binary)
            .args(args)
            .current_dir(&self.env_dir)
            .env("HOME", &self.home_dir)
            .env("NO_COLOR", "1")
            .env_remove("JX_SECRETS_YAML")
            .envs(env.iter().copied())
            .output()
            .context("Failed to run helmplan command")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert the command failed
    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    /// Assert a file exists
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert a file does not exist
    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(!path.exists(), "Expected file to not exist: {}", path.display());
    }

    /// Assert a file contains specific content
    pub fn contains(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
        assert!(
            content.contains(expected),
            "Expected file {} to contain '{}'\nActual content: {}",
            path.display(),
            expected,
            content
        );
    }
}
