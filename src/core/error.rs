//! Error handling for helmplan
//!
//! This module provides the typed error enum used across the crate and the
//! user-facing error report printed by the CLI. It follows two principles:
//! 1. **Strongly-typed errors** for the failure modes callers match on
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration**: [`HelmplanError::AppsConfigNotFound`],
//!   [`HelmplanError::InvalidPhase`], [`HelmplanError::InvalidApplication`],
//!   [`HelmplanError::InvalidNamespace`], [`HelmplanError::DuplicateRelease`],
//!   [`HelmplanError::SettingsError`]
//! - **External tools**: [`HelmplanError::ToolNotFound`],
//!   [`HelmplanError::ToolCommandError`], [`HelmplanError::ToolTimeout`]
//! - **File system**: [`HelmplanError::FileSystemError`], carrying the path
//!   that failed
//!
//! Lookup misses (no stable version, no local values file) are not errors and
//! never surface here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmplan_cli::core::{HelmplanError, ErrorContext, user_friendly_error};
//!
//! let error = HelmplanError::InvalidPhase {
//!     app: "velero".to_string(),
//!     phase: "boot".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for helmplan operations.
///
/// Configuration errors abort compilation of the affected phase. I/O errors
/// are wrapped with the path or operation involved before they reach the
/// caller. Nothing is retried internally.
#[derive(Error, Debug, Clone)]
pub enum HelmplanError {
    /// The applications config (`jx-apps.yml`) could not be found
    #[error("No jx-apps.yml found in directory: {dir}")]
    AppsConfigNotFound {
        /// Directory that was searched
        dir: String,
    },

    /// The applications config exists but is not valid YAML for the schema
    #[error("Invalid applications config syntax in {file}")]
    AppsConfigParseError {
        /// Path to the file that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// An application declared a phase other than `system` or `apps`
    #[error("Invalid phase '{phase}' for application '{app}'")]
    InvalidPhase {
        /// Application name
        app: String,
        /// The rejected phase value
        phase: String,
    },

    /// An application entry is structurally invalid
    #[error("Invalid application '{name}': {reason}")]
    InvalidApplication {
        /// Application name (may be empty when the name itself is missing)
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A namespace is not a valid DNS-1123 label
    #[error("Invalid namespace '{namespace}' from {origin}")]
    InvalidNamespace {
        /// The rejected namespace
        namespace: String,
        /// Where the value came from (e.g. "the settings file")
        origin: String,
    },

    /// Two applications in the same phase resolve to the same release name
    #[error("Duplicate release '{name}' in phase '{phase}'")]
    DuplicateRelease {
        /// Release name
        name: String,
        /// Phase directory name
        phase: String,
    },

    /// The settings file is invalid
    #[error("Settings error: {message}")]
    SettingsError {
        /// Description of the problem
        message: String,
    },

    /// A required executable (`helm`, `kubectl`) is not on PATH
    #[error("{tool} is not installed or not found in PATH")]
    ToolNotFound {
        /// Executable name
        tool: String,
    },

    /// An external tool exited with a non-zero status
    #[error("{tool} command failed: {operation}")]
    ToolCommandError {
        /// Executable name
        tool: String,
        /// The subcommand that failed (e.g. "repo list")
        operation: String,
        /// Captured standard error
        stderr: String,
    },

    /// An external tool did not finish within its timeout
    #[error("{tool} command timed out after {seconds}s: {operation}")]
    ToolTimeout {
        /// Executable name
        tool: String,
        /// The subcommand that timed out
        operation: String,
        /// Timeout in seconds
        seconds: u64,
    },

    /// A file system operation failed
    #[error("Failed to {operation} {path}: {reason}")]
    FileSystemError {
        /// The operation (e.g. "write", "remove directory")
        operation: String,
        /// Path involved
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Generic error with a message
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: HelmplanError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: HelmplanError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HelmplanError`] anywhere in the `anyhow` chain and otherwise
/// renders the full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for (depth, cause) in error.chain().enumerate() {
        if let Some(helmplan_error) = cause.downcast_ref::<HelmplanError>() {
            let mut ctx = create_error_context(helmplan_error.clone());
            // Keep the outermost context message when the typed error sits below it
            if ctx.details.is_none() && depth > 0 {
                ctx.details = Some(error.to_string());
            }
            return ctx;
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HelmplanError::Other {
        message,
    })
}

fn create_error_context(error: HelmplanError) -> ErrorContext {
    match &error {
        HelmplanError::AppsConfigNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run from the environment repository root or pass --dir <path> pointing at the directory holding jx-apps.yml"),

        HelmplanError::AppsConfigParseError { file, reason } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the YAML syntax in {file}"))
            .with_details(reason.clone()),

        HelmplanError::InvalidPhase { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Use 'system' or 'apps' for the phase field, or remove it to default to 'apps'"),

        HelmplanError::DuplicateRelease { name, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Remove the duplicate '{name}' entry from jx-apps.yml or move one copy to the other phase")),

        HelmplanError::ToolNotFound { tool } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Install {tool} and make sure it is on your PATH"))
            .with_details("helmplan reads the local Helm repositories and the cluster namespace list through the helm and kubectl executables"),

        HelmplanError::ToolCommandError { tool, stderr, .. } => ErrorContext::new(error.clone())
            .with_suggestion(match tool.as_str() {
                "kubectl" => "Check that your kube context points at a reachable cluster ('kubectl config current-context')",
                "helm" => "Run 'helm repo list' manually to check your Helm configuration",
                _ => "Try running the command manually for more details",
            })
            .with_details(stderr.trim().to_string()),

        HelmplanError::ToolTimeout { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check connectivity to the cluster and retry"),

        HelmplanError::InvalidNamespace { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Namespaces must be lowercase alphanumerics and '-', at most 63 characters, starting and ending with an alphanumeric"),

        HelmplanError::FileSystemError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check that the output directory exists and is writable"),

        _ => ErrorContext::new(error.clone()),
    }
}
