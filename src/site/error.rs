//! Errors raised by the site engine.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = SiteError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site config not found: {site} at {}", path.display())]
    ConfigNotFound { site: String, path: PathBuf },

    #[error("cyclic extends: {}", cycle.join(" -> "))]
    CyclicExtends { cycle: Vec<String> },

    #[error("site not found: {site} dir: {}", path.display())]
    SiteNotFound { site: String, path: PathBuf },

    #[error("failed to write `{}`", path.display())]
    Materialize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("command `{command}` failed with {status}\n{stderr}")]
    ExternalProcess {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse `{}`", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("invalid config `{}`: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid site name `{0}`")]
    InvalidSiteName(String),

    #[error("failed to link `{}`", path.display())]
    Link {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Activation never deletes something it did not create.
    #[error("refusing to replace `{}`: not a link", path.display())]
    LinkConflict { path: PathBuf },

    #[error("timed out after {timeout:?} waiting for lock `{}`", path.display())]
    Lock { path: PathBuf, timeout: Duration },
}

impl SiteError {
    /// `map_err` adapter for I/O while producing the build output tree.
    pub fn materialize(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Materialize {
            path: path.to_path_buf(),
            source,
        }
    }

    /// `map_err` adapter for I/O while touching the project root.
    pub fn link(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Link {
            path: path.to_path_buf(),
            source,
        }
    }
}
