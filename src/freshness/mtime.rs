//! Mtime-based freshness detection.
//!
//! Source overrides are copied into `made/<site>/src` only when the source
//! is strictly newer than the copy. Copies get a fresh mtime when written,
//! so unchanged sources are skipped on every later run.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if `source` must be copied over `target`
///
/// Returns `true` if the target is missing, or the source is strictly newer
/// than the target. A source whose mtime cannot be read is never copied.
pub fn needs_copy(source: &Path, target: &Path) -> bool {
    let Some(source_time) = get_mtime(source) else {
        return false;
    };
    match get_mtime(target) {
        Some(target_time) => source_time > target_time,
        None => true,
    }
}
