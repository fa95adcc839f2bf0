//! Site management commands: list, create, show, make, clean, activate.

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::common::{Failure, Project, report_failures};
use crate::site::{
    Mapping, create_site, initial_config, list_sites, merge_chain, resolve_chain, store::to_yaml,
};
use crate::utils::path::display_relative;

/// Parent used by `create` when no `--extends` is given.
const DEFAULT_PARENT: &str = "default";

pub fn list(project: &Project) -> Result<()> {
    for site in list_sites(&project.layout().store())? {
        println!("{site}");
    }
    Ok(())
}

pub fn create(project: &Project, site: &str, extends: &[String]) -> Result<()> {
    let parents = if extends.is_empty() {
        vec![DEFAULT_PARENT.to_string()]
    } else {
        extends.to_vec()
    };

    let path = create_site(&project.layout().store(), site, &initial_config(site, &parents))?;
    println!("Created: {}", path.display());
    Ok(())
}

pub fn show(project: &Project, site: &str) -> Result<()> {
    let store = project.layout().store();
    let chain = resolve_chain(&store, site)?;
    let config: Mapping = merge_chain(&store, &chain)?;

    println!("# {}", chain.join(" > "));
    print!("{}", to_yaml(&config, &store.config_file(site))?);
    Ok(())
}

pub fn make(project: &Project, site: &str, refresh: bool) -> Result<()> {
    make_one(project, site, refresh)?;
    crate::log!(
        "make";
        "{} -> {}",
        site,
        display_relative(&project.layout().made_dir(site), project.layout().root())
    );
    Ok(())
}

/// Make every site in parallel; build trees are disjoint per site.
pub fn make_all(project: &Project, refresh: bool) -> Result<()> {
    let sites = list_sites(&project.layout().store())?;
    let results: Vec<_> = sites
        .par_iter()
        .map(|site| (site, make_one(project, site, refresh)))
        .collect();

    let mut failures = Vec::new();
    for (site, result) in results {
        match result {
            Ok(()) => crate::log!("make"; "{}", site),
            Err(err) => failures.push(Failure::record(site, &err)),
        }
    }
    report_failures(&failures)?;
    crate::log!("make"; "{} site(s) made", sites.len());
    Ok(())
}

fn make_one(project: &Project, site: &str, refresh: bool) -> Result<()> {
    let result = if refresh {
        project.maker.refresh(site)
    } else {
        project.maker.materialize(site)
    };
    result.with_context(|| format!("failed to make `{site}`"))?;
    Ok(())
}

pub fn clean(project: &Project, site: &str) -> Result<()> {
    let dir = project.maker.clean(site)?;
    crate::log!("clean"; "{}", display_relative(&dir, project.layout().root()));
    Ok(())
}

pub fn activate(project: &Project, site: &str) -> Result<()> {
    let report = project
        .target
        .activate(site)
        .with_context(|| format!("failed to activate `{site}`"))?;
    for (entry, source) in &report.linked {
        crate::debug!(
            "activate";
            "{} -> {}",
            entry,
            display_relative(source, project.layout().root())
        );
    }
    crate::log!("activate"; "{} ({} changed)", site, report.changed);
    println!("Activated: {site}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project() -> (TempDir, Project) {
        let temp = TempDir::new().unwrap();
        let config =
            ProjectConfig::load_from(Path::new("multigat-missing-8c1f.toml"), temp.path()).unwrap();
        (temp, Project::new(config))
    }

    #[test]
    fn test_create_defaults_to_default_parent() {
        let (_temp, project) = project();
        create(&project, "blog", &[]).unwrap();

        let config = project.layout().store().load("blog").unwrap();
        assert_eq!(config["name"], "blog");
        assert_eq!(config["extends"], serde_json::json!(["default"]));
    }

    #[test]
    fn test_create_rejects_bad_name() {
        let (_temp, project) = project();
        assert!(create(&project, "../escape", &[]).is_err());
    }

    #[test]
    fn test_make_all_reports_every_failure() {
        let (_temp, project) = project();
        let sites = &project.layout().sites;
        fs::create_dir_all(sites.join("good")).unwrap();
        fs::write(sites.join("good/config.yaml"), "title: Good\n").unwrap();
        fs::create_dir_all(sites.join("orphan")).unwrap();
        fs::write(sites.join("orphan/config.yaml"), "extends: [missing]\n").unwrap();

        let err = make_all(&project, false).unwrap_err();
        assert_eq!(err.to_string(), "FAILED: orphan");
        assert!(project.layout().made_dir("good").join("config.yaml").exists());
    }
}
