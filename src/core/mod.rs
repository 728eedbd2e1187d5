//! Core types for helmplan
//!
//! This module holds the error taxonomy shared by every other module:
//! - [`HelmplanError`] - Enumerated error types covering configuration, tool
//!   and I/O failures
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any `anyhow::Error` into an [`ErrorContext`]
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use helmplan_cli::core::{HelmplanError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn load() -> Result<()> {
//!     Err(HelmplanError::AppsConfigNotFound { dir: ".".to_string() }.into())
//! }
//!
//! if let Err(e) = load() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, HelmplanError, user_friendly_error};
