//! External command execution utilities.
//!
//! Provides a Builder-based API for running the site generator with its
//! output either captured or echoed to the console while captured.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Captured: output only surfaces on failure
//! Cmd::new("node").args(["--version"]).run()?;
//!
//! // Echoed: output streams to the console as it arrives
//! Cmd::new(gatsby).arg("build").cwd(root).echo(true).run()?;
//!
//! // Long-running: inherits the console, caller owns the child
//! let child = Cmd::new(gatsby).args(["develop", "-p", "8000"]).spawn()?;
//! ```

use crate::site::{Result, SiteError};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{self, BufRead, BufReader, Read, Write},
    path::{Path, PathBuf},
    process::{Child, Command, Output, Stdio},
    sync::OnceLock,
    thread,
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    echo: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Stream stdout and stderr to the console while capturing them.
    pub fn echo(mut self, enable: bool) -> Self {
        self.echo = enable;
        self
    }

    /// Full command line, for messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command to completion.
    ///
    /// A non-zero exit is an [`SiteError::ExternalProcess`] carrying the
    /// captured output.
    pub fn run(self) -> Result<Output> {
        let output = if self.echo {
            self.run_echo()?
        } else {
            self.command()
                .output()
                .map_err(|source| self.spawn_error(source))?
        };

        if !output.status.success() {
            return Err(self.failure(&output));
        }
        Ok(output)
    }

    /// Start the command with the console attached and return the child.
    pub fn spawn(self) -> Result<Child> {
        self.command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| self.spawn_error(source))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Tee both streams line by line.
    fn run_echo(&self) -> Result<Output> {
        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let stdout = child.stdout.take().map(|out| tee(out, io::stdout));
        let stderr = child.stderr.take().map(|err| tee(err, io::stderr));

        let status = child.wait().map_err(|source| self.spawn_error(source))?;
        let collect = |handle: Option<thread::JoinHandle<Vec<u8>>>| {
            handle.and_then(|h| h.join().ok()).unwrap_or_default()
        };

        Ok(Output {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }

    fn spawn_error(&self, source: io::Error) -> SiteError {
        SiteError::Spawn {
            command: self.display(),
            source,
        }
    }

    fn failure(&self, output: &Output) -> SiteError {
        SiteError::ExternalProcess {
            command: self.display(),
            status: output.status,
            stdout: clean_output(&output.stdout),
            stderr: clean_output(&output.stderr),
        }
    }
}

/// Copy `reader` to `sink` line by line on a thread, keeping the bytes.
fn tee<R, W, F>(reader: R, sink: F) -> thread::JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
    W: Write,
    F: Fn() -> W + Send + 'static,
{
    thread::spawn(move || {
        let mut captured = Vec::new();
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let mut out = sink();
                    let _ = out.write_all(&line);
                    let _ = out.flush();
                    captured.extend_from_slice(&line);
                }
            }
        }
        captured
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Captured output as trimmed text without color codes.
fn clean_output(bytes: &[u8]) -> String {
    strip_ansi(String::from_utf8_lossy(bytes).trim()).into_owned()
}

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").ok()) {
        Some(re) => re.replace_all(s, ""),
        None => std::borrow::Cow::Borrowed(s),
    }
}

// ============================================================================
// Tests
// ============================================================================
