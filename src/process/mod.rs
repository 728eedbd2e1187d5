//! Subprocess execution for external tools.

pub mod command_builder;

pub use command_builder::{DEFAULT_TIMEOUT, ToolCommand, ToolOutput};
