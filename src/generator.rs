//! Running the site generator against the project root.
//!
//! The generator is an external program. `build` runs to completion with
//! its output echoed and captured, `develop` is spawned with the console
//! attached and left to the caller.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Output};

use crate::config::ProjectConfig;
use crate::site::{Result, SiteError};
use crate::utils::exec::Cmd;

/// Arguments for a production build.
pub fn build_args() -> Vec<String> {
    vec!["build".into()]
}

/// Arguments for the development server.
pub fn develop_args(port: u16, open: bool) -> Vec<String> {
    let mut args = vec!["develop".into(), "-p".into(), port.to_string()];
    if open {
        args.push("-o".into());
    }
    args
}

/// `<root>/<bin>` when it exists, else `bin` looked up on `PATH`.
pub fn resolve_bin(bin: &Path, root: &Path) -> Result<PathBuf> {
    let local = root.join(bin);
    if local.is_file() {
        return Ok(local);
    }
    which::which(bin).map_err(|err| SiteError::Spawn {
        command: bin.display().to_string(),
        source: io::Error::new(
            io::ErrorKind::NotFound,
            format!("not in {} or on PATH: {err}", root.display()),
        ),
    })
}

/// The generator executable, bound to a project root.
#[derive(Debug, Clone)]
pub struct Gatsby {
    program: PathBuf,
    root: PathBuf,
}

impl Gatsby {
    pub fn new(program: PathBuf, root: PathBuf) -> Self {
        Self { program, root }
    }

    pub fn from_config(config: &ProjectConfig) -> Result<Self> {
        let program = resolve_bin(&config.gatsby.bin, config.get_root())?;
        Ok(Self::new(program, config.get_root().to_path_buf()))
    }

    /// Build the active site into `<root>/public`.
    pub fn build(&self, echo: bool) -> Result<Output> {
        crate::debug!("gatsby"; "{} build in {}", self.program.display(), self.root.display());
        Cmd::new(&self.program)
            .args(build_args())
            .cwd(&self.root)
            .echo(echo)
            .run()
    }

    /// Start the development server for the active site.
    pub fn develop(&self, port: u16, open: bool) -> Result<Child> {
        Cmd::new(&self.program)
            .args(develop_args(port, open))
            .cwd(&self.root)
            .spawn()
    }
}
