//! File system utilities
//!
//! - [`atomic_write`] / [`safe_write`]: temp-file-and-rename writes
//! - [`ensure_dir`] / [`remove_dir_all`]: directory management with contextual errors

pub mod atomic;
pub mod dirs;

pub use atomic::{atomic_write, safe_write};
pub use self::dirs::{ensure_dir, remove_dir_all};
