//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! sites = "sites"                 # One directory per site
//! default_site = "default-site"   # Fallback generator inputs
//! made = "made"                   # Generated build trees
//! dist = "dist"                   # Generator output per site
//! ```
//!
//! Relative paths are resolved against the project root, `~` is expanded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::site::SiteLayout;
use crate::utils::path::normalize_path;

/// Project directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub sites: PathBuf,
    pub default_site: PathBuf,
    pub made: PathBuf,
    pub dist: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sites: "sites".into(),
            default_site: "default-site".into(),
            made: "made".into(),
            dist: "dist".into(),
        }
    }
}

impl PathsConfig {
    /// Make every path absolute under `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in [
            &mut self.sites,
            &mut self.default_site,
            &mut self.made,
            &mut self.dist,
        ] {
            *path = resolve(path, root);
        }
    }

    /// Directory layout rooted at `root`.
    pub fn layout(&self, root: &Path) -> SiteLayout {
        SiteLayout {
            root: root.to_path_buf(),
            sites: self.sites.clone(),
            default_site: self.default_site.clone(),
            made: self.made.clone(),
            dist: self.dist.clone(),
        }
    }

    /// `(field, path)` pairs, for validation messages.
    pub fn entries(&self) -> [(&'static str, &Path); 4] {
        [
            ("paths.sites", &self.sites),
            ("paths.default_site", &self.default_site),
            ("paths.made", &self.made),
            ("paths.dist", &self.dist),
        ]
    }
}

fn resolve(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() {
        root.join(path)
    } else {
        path
    };
    normalize_path(&full)
}
