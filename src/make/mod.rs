//! Build output tree per site (`made/<site>/`).
//!
//! ```text
//! made/<site>/
//! ├── gatsby-config.js     # generated from the effective config
//! ├── config.yaml          # effective config (YAML)
//! └── src/                 # sources of the whole mixin chain, merged
//!     └── data/site.json   # effective config (JSON)
//! ```
//!
//! Every step is incremental: sources are copied only when newer, generated
//! files are written only when their bytes change. A failed make leaves a
//! partial tree that the next run repairs file by file.

pub mod copy;
pub mod gatsby;
pub mod layout;
pub mod write;

use std::fs;
use std::path::{Path, PathBuf};

use crate::site::{Mapping, Result, SiteError, SiteLayout, merge_chain, resolve_chain};

/// Generated generator config module.
pub const GATSBY_CONFIG: &str = "gatsby-config.js";
/// YAML snapshot of the effective config.
pub const CONFIG_YAML: &str = "config.yaml";
/// Source tree directory, in sites and in the build output alike.
pub const SRC_DIR: &str = "src";
/// JSON snapshot of the effective config, relative to `src/`.
pub const SITE_DATA: &str = "data/site.json";

/// Produces `made/<site>/` from the site configs and source overrides.
#[derive(Debug, Clone)]
pub struct Materializer {
    layout: SiteLayout,
}

impl Materializer {
    pub fn new(layout: SiteLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Scaffold and make the full build output tree of `site`.
    pub fn materialize(&self, site: &str) -> Result<Mapping> {
        self.make(site, true)
    }

    /// Re-make `site` without scaffolding (used on file changes).
    pub fn refresh(&self, site: &str) -> Result<Mapping> {
        self.make(site, false)
    }

    /// Remove everything under `made/<site>/`, keeping the directory.
    pub fn clean(&self, site: &str) -> Result<PathBuf> {
        let dir = self.layout.made_dir(site);
        empty_dir(&dir)?;
        Ok(dir)
    }

    fn make(&self, site: &str, scaffold: bool) -> Result<Mapping> {
        self.layout.require_site(site)?;

        let store = self.layout.store();
        let chain = resolve_chain(&store, site)?;
        let config = merge_chain(&store, &chain)?;

        let made = self.layout.made_dir(site);
        let src = made.join(SRC_DIR);
        if scaffold {
            for dir in [&made, &src, &src.join("data")] {
                fs::create_dir_all(dir).map_err(SiteError::materialize(dir))?;
            }
        }

        let gatsby_config = gatsby::render_gatsby_config(&config, &store.config_file(site))?;
        write::write_if_changed(&made.join(GATSBY_CONFIG), &gatsby_config)?;

        let source_dirs: Vec<_> = chain
            .iter()
            .map(|s| self.layout.site_dir(s).join(SRC_DIR))
            .collect();
        let copied = copy::copy_src_files(&source_dirs, &src)?;

        write::write_site_data(&config, &src.join(SITE_DATA))?;
        write::write_config_yaml(&config, &made.join(CONFIG_YAML))?;
        layout::customize_components(&config, &src)?;

        crate::debug!("make"; "{} [{}] copied {} file(s)", site, chain.join(" > "), copied);
        Ok(config)
    }
}

/// Delete the contents of `dir`. A missing directory is already empty.
pub fn empty_dir(dir: &Path) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(SiteError::Materialize {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    for entry in entries {
        let entry = entry.map_err(SiteError::materialize(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(SiteError::materialize(&path))?;
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(SiteError::materialize(&path))?;
    }
    Ok(())
}
