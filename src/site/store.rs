//! Per-site YAML config files.
//!
//! ```text
//! sites/
//! ├── default/
//! │   ├── config.yaml
//! │   └── src/
//! └── blog/
//!     └── config.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::{Result, SiteError};
use super::value::{Mapping, nulls_to_blanks};

/// Config filename inside every site directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Reads and writes `sites/<site>/config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    sites_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(sites_dir: impl Into<PathBuf>) -> Self {
        Self {
            sites_dir: sites_dir.into(),
        }
    }

    pub fn sites_dir(&self) -> &Path {
        &self.sites_dir
    }

    /// Directory holding a site's config and source overrides.
    pub fn site_dir(&self, site: &str) -> PathBuf {
        self.sites_dir.join(site)
    }

    /// Path of a site's config file (may not exist).
    pub fn config_file(&self, site: &str) -> PathBuf {
        self.site_dir(site).join(CONFIG_FILE)
    }

    /// Path of a site's config file, failing if it is missing.
    pub fn site_path(&self, site: &str) -> Result<PathBuf> {
        let path = self.config_file(site);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SiteError::ConfigNotFound {
                site: site.to_string(),
                path,
            })
        }
    }

    /// Load a site's config with nulls normalized to blanks.
    pub fn load(&self, site: &str) -> Result<Mapping> {
        let path = self.site_path(site)?;
        let content = fs::read_to_string(&path).map_err(|_| SiteError::ConfigNotFound {
            site: site.to_string(),
            path: path.clone(),
        })?;
        parse_config(&content, &path).map(nulls_to_blanks)
    }

    /// Write a config document as YAML.
    pub fn write(&self, site: &str, config: &Mapping) -> Result<PathBuf> {
        let path = self.config_file(site);
        let body = to_yaml(config, &path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SiteError::materialize(parent))?;
        }
        fs::write(&path, body).map_err(SiteError::materialize(&path))?;
        Ok(path)
    }
}

/// Parse a YAML document whose root must be a mapping.
///
/// An empty document is an empty mapping.
pub fn parse_config(content: &str, path: &Path) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value =
        serde_yaml_ng::from_str(content).map_err(|source| SiteError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(SiteError::InvalidConfig {
            path: path.to_path_buf(),
            message: format!("expected a mapping at the document root, got {other}"),
        }),
    }
}

/// Serialize a config document as YAML.
pub fn to_yaml(config: &Mapping, path: &Path) -> Result<String> {
    serde_yaml_ng::to_string(config).map_err(|err| SiteError::InvalidConfig {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
