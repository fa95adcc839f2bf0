//! Site configs: storage, mixin chains and merging.
//!
//! # Module Structure
//!
//! ```text
//! site/
//! ├── error      # SiteError
//! ├── merge      # deep merge, effective config
//! ├── mixin      # extends chain resolution
//! ├── registry   # list / create
//! ├── store      # config.yaml read/write
//! └── value      # Mapping, null normalization
//! ```

pub mod error;
pub mod merge;
pub mod mixin;
pub mod registry;
pub mod store;
pub mod value;

pub use error::{Result, SiteError};
pub use merge::{effective_config, merge_chain};
pub use mixin::resolve_chain;
pub use registry::{create_site, initial_config, list_sites};
pub use store::ConfigStore;
pub use value::Mapping;

use std::path::{Path, PathBuf};

/// Where every site-related directory lives inside the project root.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Project root (the generator's working directory)
    pub root: PathBuf,
    /// `sites/`: one directory per site
    pub sites: PathBuf,
    /// `default-site/`: fallback files for activation
    pub default_site: PathBuf,
    /// `made/`: generated build output per site
    pub made: PathBuf,
    /// `dist/`: generator output per site
    pub dist: PathBuf,
}

impl SiteLayout {
    /// Layout with the conventional directory names under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            sites: root.join("sites"),
            default_site: root.join("default-site"),
            made: root.join("made"),
            dist: root.join("dist"),
            root,
        }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.sites)
    }

    pub fn site_dir(&self, site: &str) -> PathBuf {
        self.sites.join(site)
    }

    /// `made/<site>/`
    pub fn made_dir(&self, site: &str) -> PathBuf {
        self.made.join(site)
    }

    /// `dist/<site>/`
    pub fn dist_dir(&self, site: &str) -> PathBuf {
        self.dist.join(site)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail with `SiteNotFound` unless `sites/<site>/` exists.
    pub fn require_site(&self, site: &str) -> Result<PathBuf> {
        let dir = self.site_dir(site);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(SiteError::SiteNotFound {
                site: site.to_string(),
                path: dir,
            })
        }
    }
}
