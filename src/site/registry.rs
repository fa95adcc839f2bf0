//! Listing and creating sites.

use std::fs;
use std::path::PathBuf;

use super::error::{Result, SiteError};
use super::store::ConfigStore;
use super::value::Mapping;

/// Names of all sites, sorted.
///
/// Hidden entries and plain files are skipped. A missing sites directory
/// means there are no sites yet.
pub fn list_sites(store: &ConfigStore) -> Result<Vec<String>> {
    let dir = store.sites_dir();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(SiteError::Materialize {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut sites: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    sites.sort();
    Ok(sites)
}

/// Create a site config unless one already exists.
///
/// Returns the config path either way.
pub fn create_site(store: &ConfigStore, site: &str, config: &Mapping) -> Result<PathBuf> {
    validate_site_name(site)?;

    let path = store.config_file(site);
    if path.exists() {
        crate::debug!("create"; "exists: {}", path.display());
        return Ok(path);
    }
    store.write(site, config)
}

/// Default config for a new site: named after it, extending `parents`.
pub fn initial_config(site: &str, parents: &[String]) -> Mapping {
    let mut config = Mapping::new();
    config.insert("name".into(), site.into());
    config.insert("extends".into(), parents.to_vec().into());
    config
}

fn validate_site_name(site: &str) -> Result<()> {
    let bad = site.is_empty()
        || site.starts_with('.')
        || site.contains(['/', '\\']);
    if bad {
        return Err(SiteError::InvalidSiteName(site.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_skips_hidden_and_files() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());
        for dir in ["blog", "default", ".git"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("README.md"), "notes").unwrap();

        assert_eq!(list_sites(&store).unwrap(), vec!["blog", "default"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("sites"));
        assert!(list_sites(&store).unwrap().is_empty());
    }

    #[test]
    fn test_create_writes_once() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());

        let config = initial_config("blog", &["default".to_string()]);
        let path = create_site(&store, "blog", &config).unwrap();
        assert!(path.exists());
        assert_eq!(store.load("blog").unwrap(), config);

        fs::write(&path, "title: edited\n").unwrap();
        let again = create_site(&store, "blog", &initial_config("blog", &[])).unwrap();
        assert_eq!(again, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "title: edited\n");
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());
        let config = Mapping::new();
        for name in ["", ".hidden", "a/b"] {
            assert!(matches!(
                create_site(&store, name, &config),
                Err(SiteError::InvalidSiteName(_))
            ));
        }
    }
}
