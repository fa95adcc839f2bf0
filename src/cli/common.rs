//! Common utilities shared across CLI commands.

use anyhow::{Result, bail};

use crate::activate::{ActivationTarget, STATE_DIR, strategy};
use crate::config::ProjectConfig;
use crate::make::Materializer;
use crate::site::SiteLayout;

/// Everything a command needs, built once from the loaded config.
pub struct Project {
    pub config: ProjectConfig,
    pub maker: Materializer,
    pub target: ActivationTarget,
}

impl Project {
    pub fn new(config: ProjectConfig) -> Self {
        if let Some(path) = &config.config_path {
            crate::debug!("config"; "{}", path.display());
        }
        let layout = config.layout();
        let strategy = strategy::from_kind(config.activate.strategy, &layout.root.join(STATE_DIR));
        let target = ActivationTarget::new(layout.clone(), strategy, config.activate.lock_timeout());
        Self {
            maker: Materializer::new(layout),
            target,
            config,
        }
    }

    pub fn layout(&self) -> &SiteLayout {
        self.maker.layout()
    }
}

/// A site that failed in a multi-site command.
pub struct Failure {
    pub site: String,
    pub description: String,
}

impl Failure {
    /// Log the failure at once and keep its full description for the summary.
    pub fn record(site: &str, err: &anyhow::Error) -> Self {
        crate::log!("error"; "{}: {}", site, err);
        Self {
            site: site.to_string(),
            description: format!("FAILED: {site}\n{err:#}"),
        }
    }
}

const SEPARATOR: &str = "---------------------------------------------------------------";

/// Print every failure in full, then fail with the list of sites.
pub fn report_failures(failures: &[Failure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    for failure in failures {
        eprintln!("{SEPARATOR}");
        eprintln!("{}", failure.description);
    }
    eprintln!("{SEPARATOR}");

    let sites: Vec<_> = failures.iter().map(|f| f.site.as_str()).collect();
    bail!("FAILED: {}", sites.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_failures() {
        assert!(report_failures(&[]).is_ok());
    }

    #[test]
    fn test_failures_are_listed() {
        let failures = [
            Failure::record("a", &anyhow::anyhow!("broken config")),
            Failure::record("b", &anyhow::anyhow!("gatsby exited with 1")),
        ];
        assert_eq!(failures[0].description, "FAILED: a\nbroken config");

        let err = report_failures(&failures).unwrap_err();
        assert_eq!(err.to_string(), "FAILED: a, b");
    }
}
