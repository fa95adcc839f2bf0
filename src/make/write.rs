//! Write-if-changed helpers for generated files.
//!
//! Generated files are only rewritten when their bytes change, so the
//! generator's own watcher is not woken by a no-op make.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::site::store::to_yaml;
use crate::site::{Mapping, Result, SiteError};

/// Write `contents` to `path` unless it already holds exactly those bytes.
///
/// Creates parent directories as needed. Returns whether a write happened.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if let Ok(current) = fs::read(path)
        && current == contents.as_bytes()
    {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(SiteError::materialize(parent))?;
    }
    fs::write(path, contents).map_err(SiteError::materialize(path))?;
    crate::debug!("write"; "{}", path.display());
    Ok(true)
}

/// Save the effective config as pretty JSON for the generator to read.
pub fn write_site_data(config: &Mapping, path: &Path) -> Result<bool> {
    let json = serde_json::to_string_pretty(&Value::Object(config.clone()))
        .map_err(|err| SiteError::materialize(path)(err.into()))?;
    write_if_changed(path, &json)
}

/// Save the effective config as YAML.
pub fn write_config_yaml(config: &Mapping, path: &Path) -> Result<bool> {
    let yaml = to_yaml(config, path)?;
    write_if_changed(path, &yaml)
}
