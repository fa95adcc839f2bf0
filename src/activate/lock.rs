//! Cross-process lock on the project root.
//!
//! Two `multigat` processes activating different sites at once would leave
//! the root pointing at a mix of both. Activation holds an advisory lock on
//! `.multigat/activate.lock` for its whole run; the lock is released when
//! the guard is dropped.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::site::{Result, SiteError};

const LOCK_FILENAME: &str = "activate.lock";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const WARN_AFTER: Duration = Duration::from_millis(500);

/// Held advisory lock.
pub struct RootLock {
    path: PathBuf,
    _file: File,
}

impl RootLock {
    /// Acquire the lock inside `state_dir`, waiting up to `timeout`.
    pub fn acquire(state_dir: &Path, timeout: Duration) -> Result<Self> {
        fs::create_dir_all(state_dir).map_err(SiteError::link(state_dir))?;

        let path = state_dir.join(LOCK_FILENAME);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(SiteError::link(&path))?;

        let start = Instant::now();
        let mut warned = false;
        loop {
            match file.try_lock() {
                Ok(()) => {
                    if warned {
                        crate::log!("activate"; "lock acquired after {:.1}s", start.elapsed().as_secs_f64());
                    }
                    return Ok(Self { path, _file: file });
                }
                Err(TryLockError::WouldBlock) => {
                    if !warned && start.elapsed() > WARN_AFTER {
                        crate::log!("activate"; "waiting for another activation ({})", path.display());
                        warned = true;
                    }
                }
                Err(TryLockError::Error(source)) => return Err(SiteError::Link { path, source }),
            }

            if start.elapsed() >= timeout {
                return Err(SiteError::Lock { path, timeout });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_and_release() {
        let temp = TempDir::new().unwrap();
        let lock = RootLock::acquire(temp.path(), Duration::from_secs(1)).unwrap();
        assert!(lock.path().exists());
        drop(lock);

        RootLock::acquire(temp.path(), Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn test_contended_lock_times_out() {
        let temp = TempDir::new().unwrap();
        let _held = RootLock::acquire(temp.path(), Duration::from_secs(1)).unwrap();

        let err = RootLock::acquire(temp.path(), Duration::from_millis(120))
            .err()
            .unwrap();
        assert!(matches!(err, SiteError::Lock { .. }));
    }
}
