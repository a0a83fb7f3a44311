//! Process execution seam.
//!
//! Every search-path lookup and every package manager invocation goes through a
//! [`CommandRunner`], so the resolver can be exercised against scripted output
//! without a real package manager on the host.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::trace;

use crate::errors::{ProvidesError, Result};

/// A program plus its argument vector. Arguments are passed as-is, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The program's file name, e.g. `dpkg` for `/usr/bin/dpkg`.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Arguments as UTF-8 strings, lossily converted.
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit code and captured stdout of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn new(code: i32, stdout: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: stdout.into(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Looks `name` up on the command search path.
    fn find(&self, name: &str) -> Option<PathBuf>;

    /// Runs `invocation` to completion and captures its stdout; stderr is discarded.
    ///
    /// A non-zero exit is not an error; only failing to run the program at all is.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runs real processes and searches the real `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn find(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        trace!("Running: {}", invocation);
        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| ProvidesError::command_failed(invocation.to_string(), e.to_string()))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
