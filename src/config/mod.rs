//! Project configuration management for `multigat.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── activate   # [activate]
//! │   ├── gatsby     # [gatsby]
//! │   ├── paths      # [paths]
//! │   └── watch      # [watch]
//! ├── error          # ConfigError
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[paths]`    | sites, default site, made and dist directories   |
//! | `[gatsby]`   | generator executable, dev server port and open   |
//! | `[activate]` | symlink or copy strategy, lock timeout           |
//! | `[watch]`    | re-make debounce window                          |
//!
//! The file is optional: without one every section takes its defaults and
//! the current directory is the project root.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ActivateConfig, GatsbyConfig, PathsConfig, StrategyKind, WatchConfig};

use crate::log;
use crate::site::SiteLayout;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing multigat.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub gatsby: GatsbyConfig,

    #[serde(default)]
    pub activate: ActivateConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Load configuration, searching upward from the current directory.
    ///
    /// The project root is the config file's parent directory, or the
    /// current directory when no config file exists.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(config_name, &cwd)
    }

    /// [`ProjectConfig::load`] with an explicit starting directory.
    pub fn load_from(config_name: &Path, cwd: &Path) -> Result<Self> {
        let (mut config, root) = match find_config_file(config_name, cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(normalize_path(&path));
                (config, root)
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                (Self::default(), cwd.to_path_buf())
            }
        };

        config.normalize_paths(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Site directory layout under the project root.
    pub fn layout(&self) -> SiteLayout {
        self.paths.layout(&self.root)
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        self.root = normalize_path(root);
        self.paths.normalize(&self.root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Reject settings no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.gatsby.port == 0 {
            return Err(ConfigError::Validation("`gatsby.port` must not be 0".into()).into());
        }
        if self.gatsby.bin.as_os_str().is_empty() {
            return Err(ConfigError::Validation("`gatsby.bin` must not be empty".into()).into());
        }
        if self.watch.debounce_ms == 0 {
            return Err(
                ConfigError::Validation("`watch.debounce_ms` must be positive".into()).into(),
            );
        }

        let entries = self.paths.entries();
        for (i, (field, path)) in entries.iter().enumerate() {
            if *path == self.root {
                return Err(ConfigError::Validation(format!(
                    "`{field}` must not be the project root"
                ))
                .into());
            }
            for (other, other_path) in &entries[i + 1..] {
                if path.starts_with(other_path) || other_path.starts_with(path) {
                    return Err(ConfigError::Validation(format!(
                        "`{field}` and `{other}` overlap"
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// test helpers
// ============================================================================

/// Parse a config and fail the test on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_config_file() {
        let temp = TempDir::new().unwrap();
        let config =
            ProjectConfig::load_from(Path::new("multigat-missing-8c1f.toml"), temp.path()).unwrap();

        let root = normalize_path(temp.path());
        assert!(config.config_path.is_none());
        assert_eq!(config.root, root);
        assert_eq!(config.layout().sites, root.join("sites"));
        assert_eq!(config.gatsby.port, 8000);
    }

    #[test]
    fn test_load_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("multigat.toml"),
            "[paths]\nsites = \"config/sites\"\n\n[gatsby]\nport = 9000\n",
        )
        .unwrap();
        let nested = temp.path().join("config/sites/blog");
        fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::load_from(Path::new("multigat.toml"), &nested).unwrap();
        let root = normalize_path(temp.path());
        assert_eq!(config.root, root);
        assert_eq!(config.paths.sites, root.join("config/sites"));
        assert_eq!(config.gatsby.port, 9000);
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (config, ignored) =
            ProjectConfig::parse_with_ignored("[gatsby]\nport = 8001\nhost = \"x\"\n").unwrap();
        assert_eq!(config.gatsby.port, 8001);
        assert_eq!(ignored, vec!["gatsby.host".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("multigat.toml"), "[gatsby\n").unwrap();
        let err = ProjectConfig::load_from(Path::new("multigat.toml"), temp.path()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_validate_rejects_overlapping_paths() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("multigat.toml"),
            "[paths]\nmade = \"sites/made\"\n",
        )
        .unwrap();
        let err = ProjectConfig::load_from(Path::new("multigat.toml"), temp.path()).unwrap_err();
        assert!(format!("{err}").contains("overlap"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = test_parse_config("[gatsby]\nport = 0");
        config.normalize_paths(Path::new("/project"));
        assert!(config.validate().is_err());
    }
}
