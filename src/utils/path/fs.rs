//! Filesystem path normalization.

use std::path::{Path, PathBuf};

/// Absolute form of `path`.
///
/// Existing paths are canonicalized (symlinks, `.` and `..` resolved).
/// Anything else is made absolute against the current directory as-is.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// `path` relative to `root` for display, or `path` itself outside it.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
