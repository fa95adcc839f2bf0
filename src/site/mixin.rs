//! Mixin chain resolution over `extends`.
//!
//! ```text
//!        default
//!        /     \
//!     base    theme        blog: extends [base, theme]
//!        \     /
//!         blog             chain: [default, base, theme, blog]
//! ```

use rustc_hash::FxHashSet;

use super::error::{Result, SiteError};
use super::store::ConfigStore;
use super::value::extends_of;

/// Ordered ancestors of `site`, ending with `site` itself.
///
/// Parents are expanded depth-first in the order they are listed, then
/// duplicates are dropped keeping the first occurrence.
pub fn resolve_chain(store: &ConfigStore, site: &str) -> Result<Vec<String>> {
    let mut visiting = Vec::new();
    expand(store, site, &mut visiting)
}

fn expand(store: &ConfigStore, site: &str, visiting: &mut Vec<String>) -> Result<Vec<String>> {
    if let Some(pos) = visiting.iter().position(|s| s == site) {
        let mut cycle = visiting[pos..].to_vec();
        cycle.push(site.to_string());
        return Err(SiteError::CyclicExtends { cycle });
    }

    let config = store.load(site)?;
    let parents = extends_of(&config).map_err(|message| SiteError::InvalidConfig {
        path: store.config_file(site),
        message,
    })?;

    let Some(parents) = parents else {
        return Ok(vec![site.to_string()]);
    };

    visiting.push(site.to_string());
    let mut chain = Vec::new();
    for parent in &parents {
        chain.extend(expand(store, parent, visiting)?);
    }
    visiting.pop();

    chain.push(site.to_string());
    Ok(dedup_first(chain))
}

/// Drop repeated names, first occurrence wins.
fn dedup_first(chain: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    chain
        .into_iter()
        .filter(|site| seen.insert(site.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(sites: &[(&str, &str)]) -> (TempDir, ConfigStore) {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path());
        for (site, yaml) in sites {
            fs::create_dir_all(store.site_dir(site)).unwrap();
            fs::write(store.config_file(site), yaml).unwrap();
        }
        (temp, store)
    }

    #[test]
    fn test_no_extends() {
        let (_temp, store) = store_with(&[("a", "title: A\n")]);
        assert_eq!(resolve_chain(&store, "a").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_single_parent() {
        let (_temp, store) = store_with(&[("a", "extends: [b]\n"), ("b", "title: B\n")]);
        assert_eq!(resolve_chain(&store, "a").unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_diamond() {
        let (_temp, store) = store_with(&[
            ("a", "extends: [b, c]\n"),
            ("b", "extends: [d]\n"),
            ("c", "extends: [d]\n"),
            ("d", "title: D\n"),
        ]);
        assert_eq!(resolve_chain(&store, "a").unwrap(), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_missing_ancestor() {
        let (_temp, store) = store_with(&[("a", "extends: [ghost]\n")]);
        let err = resolve_chain(&store, "a").unwrap_err();
        assert!(matches!(err, SiteError::ConfigNotFound { ref site, .. } if site == "ghost"));
    }

    #[test]
    fn test_cycle_detected() {
        let (_temp, store) = store_with(&[
            ("a", "extends: [b]\n"),
            ("b", "extends: [c]\n"),
            ("c", "extends: [a]\n"),
        ]);
        match resolve_chain(&store, "a").unwrap_err() {
            SiteError::CyclicExtends { cycle } => assert_eq!(cycle, vec!["a", "b", "c", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_extension_is_cycle() {
        let (_temp, store) = store_with(&[("a", "extends: a\n")]);
        assert!(matches!(
            resolve_chain(&store, "a"),
            Err(SiteError::CyclicExtends { .. })
        ));
    }
}
