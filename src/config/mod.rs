//! Configuration for helmplan
//!
//! [`Settings`] is loaded once per run from `--config <path>` or
//! `~/.helmplan/config.toml` and passed by reference into the compiler.

mod settings;

pub use settings::{DEFAULT_CHART_REPOSITORY, DEFAULT_HELM_TIMEOUT, Settings};
