//! Point the project root at one site.
//!
//! The generator only ever sees the project root. Activation makes each of
//! its input entries resolve to the chosen site's file:
//!
//! ```text
//! <root>/gatsby-config.js  -> made/<site>/gatsby-config.js
//! <root>/src               -> made/<site>/src
//! <root>/plugins           -> default-site/plugins      (site has none)
//! <root>/public            -> dist/<site>/public
//! ```
//!
//! Only one activation runs at a time: an in-process mutex plus an
//! advisory lock file shared with other `multigat` processes.

pub mod lock;
pub mod strategy;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;

use crate::make::SRC_DIR;
use crate::make::write::write_site_data;
use crate::site::{Result, SiteError, SiteLayout, effective_config};
use lock::RootLock;
use strategy::ActivationStrategy;

/// Generator input entries, in activation order.
pub const ROOT_ENTRIES: [&str; 5] = [
    "gatsby-config.js",
    "gatsby-node.js",
    "config.yaml",
    "src",
    "plugins",
];

/// Generator output directory.
pub const PUBLIC_DIR: &str = "public";

/// Tool state inside the project root.
pub const STATE_DIR: &str = ".multigat";

/// Snapshot of the effective config, relative to the site's `src/`.
pub const CONFIG_SNAPSHOT: &str = "data/config.json";

/// What one activation did.
#[derive(Debug, Default)]
pub struct ActivationReport {
    /// `(entry, source)` for every entry that now serves the site
    pub linked: Vec<(String, PathBuf)>,
    /// Entries with no source anywhere
    pub skipped: Vec<String>,
    /// How many root entries were actually replaced
    pub changed: usize,
}

/// The project root as the single place the generator reads from.
pub struct ActivationTarget {
    layout: SiteLayout,
    strategy: Box<dyn ActivationStrategy>,
    lock_timeout: Duration,
    guard: Mutex<()>,
}

impl ActivationTarget {
    pub fn new(
        layout: SiteLayout,
        strategy: Box<dyn ActivationStrategy>,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            layout,
            strategy,
            lock_timeout,
            guard: Mutex::new(()),
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        self.layout.root.join(STATE_DIR)
    }

    /// `<root>/public`
    pub fn public_dir(&self) -> PathBuf {
        self.layout.root.join(PUBLIC_DIR)
    }

    /// Link every root entry to `site`.
    pub fn activate(&self, site: &str) -> Result<ActivationReport> {
        let site_dir = self.layout.require_site(site)?;
        let config = effective_config(&self.layout.store(), site)?;

        let _guard = self.guard.lock();
        let lock = RootLock::acquire(&self.state_dir(), self.lock_timeout)?;
        crate::debug!("activate"; "holding {}", lock.path().display());

        for src in self.snapshot_dirs(&site_dir, site) {
            write_site_data(&config, &src.join(CONFIG_SNAPSHOT))?;
        }

        let mut report = ActivationReport::default();
        for entry in ROOT_ENTRIES {
            let Some(source) = self.resolve_source(site, entry) else {
                crate::debug!("activate"; "{}: no `{}` to link", site, entry);
                report.skipped.push(entry.to_string());
                continue;
            };
            if self.strategy.link(&source, &self.layout.root.join(entry))? {
                report.changed += 1;
            }
            report.linked.push((entry.to_string(), source));
        }

        let dist_public = self.layout.dist_dir(site).join(PUBLIC_DIR);
        fs::create_dir_all(&dist_public).map_err(SiteError::link(&dist_public))?;
        if self.strategy.link(&dist_public, &self.public_dir())? {
            report.changed += 1;
        }
        report.linked.push((PUBLIC_DIR.to_string(), dist_public));

        crate::debug!(
            "activate";
            "{} via {}: {} changed, {} skipped",
            site,
            self.strategy.name(),
            report.changed,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Copy generator output back into `dist/<site>/public` where the
    /// strategy needs it.
    pub fn collect_output(&self, site: &str) -> Result<()> {
        let _guard = self.guard.lock();
        let dist_public = self.layout.dist_dir(site).join(PUBLIC_DIR);
        self.strategy.collect(&dist_public, &self.public_dir())
    }

    /// `src` directories that receive the config snapshot: the site's own,
    /// plus the made one when the root `src` will point there.
    fn snapshot_dirs(&self, site_dir: &Path, site: &str) -> Vec<PathBuf> {
        let mut dirs = vec![site_dir.join(SRC_DIR)];
        let made_src = self.layout.made_dir(site).join(SRC_DIR);
        if made_src.is_dir() {
            dirs.push(made_src);
        }
        dirs
    }

    /// First existing `made/<site>/<entry>`, `sites/<site>/<entry>`,
    /// `default-site/<entry>`.
    pub fn resolve_source(&self, site: &str, entry: &str) -> Option<PathBuf> {
        [
            self.layout.made_dir(site),
            self.layout.site_dir(site),
            self.layout.default_site.clone(),
        ]
        .into_iter()
        .map(|dir| dir.join(entry))
        .find(|path| exists(path))
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
