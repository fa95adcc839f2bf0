//! Merged source tree: every site of the chain layered by relative path.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::freshness::needs_copy;
use crate::site::{Result, SiteError};

/// Map of relative path → winning source file.
///
/// Directories are layered in order, so later (more specific) sites
/// override files of earlier ones. Missing directories contribute nothing.
pub fn merged_sources(dirs: &[PathBuf]) -> Result<BTreeMap<PathBuf, PathBuf>> {
    let mut sources = BTreeMap::new();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir).skip_hidden(false) {
            let entry = entry.map_err(|err| SiteError::Materialize {
                path: dir.clone(),
                source: io::Error::other(err.to_string()),
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(dir) {
                sources.insert(relative.to_path_buf(), path.clone());
            }
        }
    }
    Ok(sources)
}

/// Copy the merged sources of `dirs` into `dest`, skipping fresh copies.
///
/// Returns the number of files copied.
pub fn copy_src_files(dirs: &[PathBuf], dest: &Path) -> Result<usize> {
    let sources = merged_sources(dirs)?;
    let mut created = FxHashSet::default();
    let mut copied = 0;

    for (relative, source) in &sources {
        let target = dest.join(relative);
        if let Some(parent) = target.parent()
            && created.insert(parent.to_path_buf())
        {
            fs::create_dir_all(parent).map_err(SiteError::materialize(parent))?;
        }
        if copy_newer(source, &target)? {
            copied += 1;
        }
    }
    Ok(copied)
}

/// Remove files under `dest` that no directory of `dirs` provides.
///
/// Returns the number of files removed. Emptied directories are left.
pub fn prune_stale(dirs: &[PathBuf], dest: &Path) -> Result<usize> {
    if !dest.is_dir() {
        return Ok(0);
    }
    let sources = merged_sources(dirs)?;
    let present = merged_sources(&[dest.to_path_buf()])?;

    let mut removed = 0;
    for (relative, path) in present {
        if sources.contains_key(&relative) {
            continue;
        }
        fs::remove_file(&path).map_err(SiteError::materialize(&path))?;
        crate::debug!("copy"; "removed stale {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

/// Copy `source` over `target` if the source is strictly newer.
pub fn copy_newer(source: &Path, target: &Path) -> Result<bool> {
    if !needs_copy(source, target) {
        return Ok(false);
    }
    fs::copy(source, target).map_err(SiteError::materialize(target))?;
    crate::debug!("copy"; "{} -> {}", source.display(), target.display());
    Ok(true)
}
