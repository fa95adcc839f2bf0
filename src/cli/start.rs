//! `start`: develop one site with live re-makes.
//!
//! ```text
//! clean → materialize → activate → gatsby develop
//!                                     ↑
//!          sites/ changes → refresh → activate
//! ```
//!
//! The generator's own development server picks up the refreshed files.

use std::path::PathBuf;
use std::process::Child;

use anyhow::{Context, Result};

use super::common::Project;
use crate::core::{is_shutdown, set_watching};
use crate::generator::Gatsby;
use crate::logger::{status_error, status_success};
use crate::site::resolve_chain;
use crate::watch::{ChangeKind, SiteWatcher};

pub fn start(project: &Project, site: &str, port: Option<u16>, watch: bool) -> Result<()> {
    let layout = project.layout();
    layout.require_site(site)?;

    // Watch before the first make so no edit slips through.
    let watcher = if watch {
        let watched = watched_dirs(project, site)?;
        Some(
            SiteWatcher::new(&watched, project.config.watch.debounce())
                .context("failed to start file watcher")?,
        )
    } else {
        None
    };

    project.maker.clean(site)?;
    project.maker.materialize(site)?;
    project.target.activate(site)?;
    println!("Activated: {site}");

    let gatsby = Gatsby::from_config(&project.config)?;
    let port = port.unwrap_or(project.config.gatsby.port);
    let mut child = gatsby.develop(port, project.config.gatsby.open)?;
    crate::log!("start"; "{} on port {}", site, port);

    let Some(mut watcher) = watcher else {
        let status = child.wait().context("failed to wait for gatsby")?;
        anyhow::ensure!(status.success(), "gatsby develop exited with {status}");
        return Ok(());
    };

    set_watching(true);
    watcher.run(
        || is_shutdown() || exited(&mut child),
        |changes| remake(project, site, changes),
    );
    set_watching(false);

    stop(&mut child);
    Ok(())
}

/// Site directories of the mixin chain of `site`.
fn watched_dirs(project: &Project, site: &str) -> Result<Vec<PathBuf>> {
    let layout = project.layout();
    let chain = resolve_chain(&layout.store(), site)?;
    Ok(chain.iter().map(|s| layout.site_dir(s)).collect())
}

/// Refresh the made tree and re-link the root after a change burst.
fn remake(project: &Project, site: &str, changes: &[(PathBuf, ChangeKind)]) {
    for (path, kind) in changes {
        crate::debug!("watch"; "{} {}", kind.label(), path.display());
    }

    let result = project
        .maker
        .refresh(site)
        .and_then(|_| project.target.activate(site));
    match result {
        Ok(_) => status_success(&format!("re-made {site} ({} change(s))", changes.len())),
        Err(err) => status_error(&format!("failed to re-make {site}"), &err.to_string()),
    }
}

fn exited(child: &mut Child) -> bool {
    match child.try_wait() {
        Ok(Some(status)) => {
            crate::log!("start"; "gatsby develop exited with {}", status);
            true
        }
        Ok(None) => false,
        Err(_) => true,
    }
}

fn stop(child: &mut Child) {
    if matches!(child.try_wait(), Ok(None)) {
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_watches_only_the_mixin_chain() {
        let temp = TempDir::new().unwrap();
        let config =
            ProjectConfig::load_from(Path::new("multigat-missing-8c1f.toml"), temp.path()).unwrap();
        let project = Project::new(config);
        let layout = project.layout();
        for (site, config) in [
            ("default", "title: Default\n"),
            ("blog", "extends: [default]\n"),
            ("shop", "extends: [default]\n"),
        ] {
            fs::create_dir_all(layout.site_dir(site)).unwrap();
            fs::write(layout.site_dir(site).join("config.yaml"), config).unwrap();
        }

        let dirs = watched_dirs(&project, "blog").unwrap();
        assert_eq!(dirs, vec![layout.site_dir("default"), layout.site_dir("blog")]);
    }
}
