//! Filesystem and platform utilities
//!
//! - [`fs`] - Atomic writes and directory management
//! - [`platform`] - Home directory lookup and `~`/`$VAR` path expansion

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, remove_dir_all, safe_write};
pub use platform::{get_home_dir, resolve_path};
