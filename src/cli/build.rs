//! `build`: produce `dist/<site>/public` for one or all sites.
//!
//! Sites build one after another: every build activates its site, and the
//! project root can only point at one site at a time.

use anyhow::{Context, Result};

use super::common::{Failure, Project, report_failures};
use crate::generator::Gatsby;
use crate::make::empty_dir;
use crate::site::list_sites;

pub fn build(project: &Project, site: Option<&str>) -> Result<()> {
    let sites = match site {
        Some(site) => vec![site.to_string()],
        None => list_sites(&project.layout().store())?,
    };
    let gatsby = Gatsby::from_config(&project.config)?;
    let echo = sites.len() == 1;

    let mut failures = Vec::new();
    for site in &sites {
        match build_site(project, &gatsby, site, echo) {
            Ok(()) => println!("BUILT: {site}"),
            Err(err) => failures.push(Failure::record(site, &err)),
        }
    }

    report_failures(&failures)?;
    println!("SUCCESS");
    Ok(())
}

/// Materialize, activate, empty `public`, run the generator, collect output.
pub fn build_site(project: &Project, gatsby: &Gatsby, site: &str, echo: bool) -> Result<()> {
    project
        .maker
        .materialize(site)
        .with_context(|| format!("failed to make `{site}`"))?;
    project
        .target
        .activate(site)
        .with_context(|| format!("failed to activate `{site}`"))?;
    empty_dir(&project.target.public_dir())?;

    crate::log!("build"; "{}", site);
    gatsby.build(echo)?;
    project.target.collect_output(site)?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Project with a `sh` stand-in for the generator: `sh build` runs the
    /// `build` script in the root, which writes one page.
    fn project() -> (TempDir, Project, Gatsby) {
        let temp = TempDir::new().unwrap();
        let config =
            ProjectConfig::load_from(Path::new("multigat-missing-8c1f.toml"), temp.path()).unwrap();
        let project = Project::new(config);
        let root = project.layout().root.clone();

        fs::write(
            root.join("build"),
            "test -f src/data/site.json || exit 2\n\
             test -f src/data/config.json || exit 3\n\
             echo built > public/index.html\n",
        )
        .unwrap();
        for site in ["blog", "default"] {
            let dir = project.layout().site_dir(site);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("config.yaml"), format!("name: {site}\n")).unwrap();
        }

        let gatsby = Gatsby::new(PathBuf::from("sh"), root);
        (temp, project, gatsby)
    }

    #[test]
    fn test_build_site_lands_in_dist() {
        let (_temp, project, gatsby) = project();
        build_site(&project, &gatsby, "blog", false).unwrap();

        let page = project.layout().dist_dir("blog").join("public/index.html");
        assert_eq!(fs::read_to_string(page).unwrap(), "built\n");
    }

    #[test]
    fn test_rebuild_replaces_previous_output() {
        let (_temp, project, gatsby) = project();
        build_site(&project, &gatsby, "blog", false).unwrap();
        let stale = project.layout().dist_dir("blog").join("public/old.html");
        fs::write(&stale, "old").unwrap();

        build_site(&project, &gatsby, "blog", false).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_generator_failure_is_reported() {
        let (_temp, project, gatsby) = project();
        fs::write(project.layout().root.join("build"), "echo nope >&2\nexit 1\n").unwrap();

        let err = build_site(&project, &gatsby, "default", false).unwrap_err();
        assert!(format!("{err:#}").contains("nope"));
    }
}
