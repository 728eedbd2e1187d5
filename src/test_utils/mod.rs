//! Test utilities shared by unit and integration tests
//!
//! Available under `#[cfg(test)]` and with the `test-utils` feature.
//!
//! - [`init_test_logging`] - Once-guarded tracing subscriber for tests
//! - [`fakes`] - In-memory implementations of the collaborator traits
//! - [`fixtures`] - Temporary environment and version stream directories

pub mod fakes;
pub mod fixtures;

pub use fakes::{StaticHelmRepos, StaticNamespaces, StaticVersionStream};
pub use fixtures::{EnvFixture, VersionStreamFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` if set, otherwise logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
