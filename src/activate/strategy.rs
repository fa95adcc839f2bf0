//! How a root entry is made to point at a site's file or directory.
//!
//! - [`SymlinkStrategy`]: a symbolic link, swapped in with a rename
//! - [`CopyStrategy`]: an owned copy, for hosts where symlinks are not
//!   available (e.g. Windows without developer mode)
//!
//! Neither strategy ever removes a root entry it did not create.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::StrategyKind;
use crate::make::copy::{copy_newer, copy_src_files, prune_stale};
use crate::make::empty_dir;
use crate::make::write::write_if_changed;
use crate::site::{Result, SiteError};

pub trait ActivationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Make `target` serve `source`. Returns whether anything changed.
    fn link(&self, source: &Path, target: &Path) -> Result<bool>;

    /// Bring output written under `target` back into `source`.
    ///
    /// Only meaningful for write destinations such as `public`.
    fn collect(&self, _source: &Path, _target: &Path) -> Result<()> {
        Ok(())
    }
}

/// Build the strategy selected in `[activate] strategy`.
pub fn from_kind(kind: StrategyKind, state_dir: &Path) -> Box<dyn ActivationStrategy> {
    match kind {
        StrategyKind::Symlink => Box::new(SymlinkStrategy),
        StrategyKind::Copy => Box::new(CopyStrategy::new(state_dir)),
    }
}

// ============================================================================
// Symlink
// ============================================================================

pub struct SymlinkStrategy;

impl ActivationStrategy for SymlinkStrategy {
    fn name(&self) -> &'static str {
        "symlink"
    }

    fn link(&self, source: &Path, target: &Path) -> Result<bool> {
        match fs::symlink_metadata(target) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let current = fs::read_link(target).map_err(SiteError::link(target))?;
                if current == source {
                    return Ok(false);
                }
            }
            Ok(_) => {
                return Err(SiteError::LinkConflict {
                    path: target.to_path_buf(),
                });
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SiteError::Link {
                    path: target.to_path_buf(),
                    source,
                });
            }
        }

        // Link under a temporary name, then rename over the old link so
        // the entry never goes missing.
        let tmp = temp_path(target);
        if fs::symlink_metadata(&tmp).is_ok() {
            remove_link(&tmp).map_err(SiteError::link(&tmp))?;
        }
        symlink(source, &tmp).map_err(SiteError::link(&tmp))?;

        #[cfg(windows)]
        if fs::symlink_metadata(target).is_ok() {
            remove_link(target).map_err(SiteError::link(target))?;
        }
        fs::rename(&tmp, target).map_err(SiteError::link(target))?;
        Ok(true)
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.multigat-tmp"))
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, link)
    } else {
        std::os::windows::fs::symlink_file(source, link)
    }
}

/// Remove a link itself, never what it points at.
fn remove_link(path: &Path) -> io::Result<()> {
    // Windows directory links must be removed as directories.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

// ============================================================================
// Copy
// ============================================================================

const MANIFEST_FILE: &str = "copied.json";

/// Root entries created by [`CopyStrategy`], target → source.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    entries: BTreeMap<PathBuf, PathBuf>,
}

pub struct CopyStrategy {
    manifest_path: PathBuf,
}

impl CopyStrategy {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            manifest_path: state_dir.join(MANIFEST_FILE),
        }
    }

    fn load(&self) -> Result<Manifest> {
        match fs::read_to_string(&self.manifest_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|err| SiteError::Link {
                path: self.manifest_path.clone(),
                source: err.into(),
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Manifest::default()),
            Err(source) => Err(SiteError::Link {
                path: self.manifest_path.clone(),
                source,
            }),
        }
    }

    fn save(&self, manifest: &Manifest) -> Result<()> {
        let json = serde_json::to_string_pretty(manifest).map_err(|err| SiteError::Link {
            path: self.manifest_path.clone(),
            source: err.into(),
        })?;
        write_if_changed(&self.manifest_path, &json)?;
        Ok(())
    }
}

impl ActivationStrategy for CopyStrategy {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn link(&self, source: &Path, target: &Path) -> Result<bool> {
        let mut manifest = self.load()?;
        let owner = manifest.entries.get(target).cloned();
        let exists = fs::symlink_metadata(target).is_ok();

        if exists && owner.as_deref() == Some(source) {
            return sync(source, target);
        }

        if exists {
            let meta = fs::symlink_metadata(target).map_err(SiteError::link(target))?;
            if meta.file_type().is_symlink() {
                remove_link(target).map_err(SiteError::link(target))?;
            } else if owner.is_some() {
                let removed = if meta.is_dir() {
                    fs::remove_dir_all(target)
                } else {
                    fs::remove_file(target)
                };
                removed.map_err(SiteError::link(target))?;
            } else {
                return Err(SiteError::LinkConflict {
                    path: target.to_path_buf(),
                });
            }
        }

        sync(source, target)?;
        manifest
            .entries
            .insert(target.to_path_buf(), source.to_path_buf());
        self.save(&manifest)?;
        Ok(true)
    }

    fn collect(&self, source: &Path, target: &Path) -> Result<()> {
        empty_dir(source)?;
        sync(target, source).map(|_| ())
    }
}

/// Mirror `from` (file or tree) onto `to`: copy-if-newer, then drop files
/// `from` no longer has.
fn sync(from: &Path, to: &Path) -> Result<bool> {
    if from.is_dir() {
        fs::create_dir_all(to).map_err(SiteError::link(to))?;
        let from = [from.to_path_buf()];
        let copied = copy_src_files(&from, to)?;
        let pruned = prune_stale(&from, to)?;
        Ok(copied + pruned > 0)
    } else {
        copy_newer(from, to)
    }
}
