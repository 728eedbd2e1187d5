//! Builder for running external tools (`helm`, `kubectl`)
//!
//! Every subprocess the crate starts goes through [`ToolCommand`] so that
//! timeouts, output capture, logging and error mapping behave the same way
//! for every tool.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::HelmplanError;

/// Default subprocess timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Fluent builder for one invocation of an external tool.
///
/// # Examples
///
/// ```rust,no_run
/// use helmplan_cli::process::ToolCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let repos = ToolCommand::new("helm")
///     .args(["repo", "list", "-o", "json"])
///     .with_context("listing local helm repositories")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    env_vars: Vec<(String, String)>,
    timeout_duration: Option<Duration>,
    context: Option<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env_vars: Vec::new(),
            timeout_duration: Some(DEFAULT_TIMEOUT),
            context: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Override the timeout. `None` waits indefinitely.
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label used in log lines for this invocation
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The leading non-flag arguments, e.g. `repo list` or `get namespaces`.
    fn operation(&self) -> String {
        let words: Vec<&str> =
            self.args.iter().take_while(|a| !a.starts_with('-')).take(2).map(String::as_str).collect();
        if words.is_empty() {
            "unknown".to_string()
        } else {
            words.join(" ")
        }
    }

    /// Run the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`HelmplanError::ToolNotFound`] if the program is not on `PATH`
    /// - [`HelmplanError::ToolTimeout`] if the timeout elapses
    /// - [`HelmplanError::ToolCommandError`] on a non-zero exit status
    pub async fn execute(self) -> Result<ToolOutput> {
        let start = std::time::Instant::now();

        let program_path = which::which(&self.program).map_err(|_| HelmplanError::ToolNotFound {
            tool: self.program.clone(),
        })?;

        let command_line = format!("{} {}", self.program, self.args.join(" "));
        match &self.context {
            Some(ctx) => tracing::debug!(target: "tool", "({}) Executing command: {}", ctx, command_line),
            None => tracing::debug!(target: "tool", "Executing command: {}", command_line),
        }

        let mut cmd = Command::new(&program_path);
        cmd.args(&self.args);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "tool", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute {command_line}"))?
            } else {
                tracing::warn!(
                    target: "tool",
                    "Command timed out after {} seconds: {}",
                    duration.as_secs(),
                    command_line
                );
                return Err(HelmplanError::ToolTimeout {
                    tool: self.program.clone(),
                    operation: self.operation(),
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute {command_line}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "tool",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "tool", "Error: {}", stderr.trim());
            }

            return Err(HelmplanError::ToolCommandError {
                tool: self.program.clone(),
                operation: self.operation(),
                stderr: if stderr.trim().is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::trace!(target: "tool", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "tool", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "tool::perf",
                "{} {} took {:.2}s",
                self.program,
                self.operation(),
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "tool::perf",
                "{} {} took {}ms",
                self.program,
                self.operation(),
                elapsed.as_millis()
            );
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }

    /// Run the command and return stdout trimmed.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }
}

/// Captured output of a successful [`ToolCommand`].
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}
