//! Package manager probes.
//!
//! A probe knows how to ask one package manager which package owns a path and
//! what version of that package is installed. Parsing of each tool's output is
//! done by pure functions in the probe's module so it can be tested without
//! running anything.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{ProvidesError, Result};
use crate::provides::Provides;
use crate::runner::{CommandRunner, Invocation};

pub mod apk;
pub mod apt;
pub mod dpkg;
pub mod rpm;

pub use apk::ApkProbe;
pub use apt::AptProbe;
pub use dpkg::DpkgProbe;
pub use rpm::RpmProbe;

static VERSION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^Version: (\S+)").expect("version pattern is valid")
});

/// A binary a probe needs before it can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub binary: &'static str,
    /// Non-zero `--version` exit codes that still mean the binary is usable.
    pub accepted_exit_codes: Vec<i32>,
}

impl Requirement {
    pub fn new(binary: &'static str) -> Self {
        Requirement {
            binary,
            accepted_exit_codes: Vec::new(),
        }
    }

    #[must_use]
    pub fn accepting(mut self, codes: &[i32]) -> Self {
        self.accepted_exit_codes = codes.to_vec();
        self
    }
}

/// Everything a probe needs to query its package manager.
pub struct ProbeContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub distro: &'a str,
    /// Located paths of the probe's requirements, in declaration order.
    pub binaries: &'a [PathBuf],
}

impl ProbeContext<'_> {
    /// Path of the `index`th requirement.
    ///
    /// Fails when the probe asks for more binaries than its
    /// [`requirements`](Probe::requirements) declare.
    pub fn binary(&self, index: usize) -> Result<&Path> {
        self.binaries
            .get(index)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                ProvidesError::command_failed(
                    format!("requirement #{}", index),
                    format!("only {} binaries were located", self.binaries.len()),
                )
            })
    }
}

/// Result of attempting one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A required binary is missing or unusable; the probe did not run.
    Unavailable,
    /// The probe ran but did not attribute the path to a package.
    Miss,
    /// The probe attributed the path to a package.
    Match(Provides),
}

pub trait Probe {
    /// Short name used in logs, e.g. `dpkg`.
    fn name(&self) -> &'static str;

    /// Binaries that must be located before [`query`](Self::query) is called.
    fn requirements(&self) -> &[Requirement];

    /// Asks the package manager who owns `path`.
    ///
    /// `Ok(None)` means the tool reported no owner. Errors are absorbed by the
    /// resolver and treated like `Ok(None)`.
    fn query(&self, ctx: &ProbeContext<'_>, path: &Path) -> Result<Option<Provides>>;
}

/// The probes in resolution order: apk, dpkg, rpm, then apt.
///
/// apt is last because `apt-file` searches a full file index instead of the
/// installed-package database and is much slower.
pub fn default_chain(apt_file_accepted_exit_codes: &[i32]) -> Vec<Box<dyn Probe + Send + Sync>> {
    vec![
        Box::new(ApkProbe::new()),
        Box::new(DpkgProbe::new()),
        Box::new(RpmProbe::new()),
        Box::new(AptProbe::new(apt_file_accepted_exit_codes)),
    ]
}

/// Runs `invocation` and returns its stdout, or `None` if it exited non-zero.
pub(crate) fn capture(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<Option<String>> {
    let output = runner.run(invocation)?;
    if output.success() {
        Ok(Some(output.stdout))
    } else {
        debug!("{} exited with {:?}", invocation, output.code);
        Ok(None)
    }
}

/// Extracts the value of the first `Version: ` field from `dpkg -s`/`apt show` style output.
pub fn parse_version_field(stdout: &str) -> Option<String> {
    VERSION_FIELD
        .captures(stdout)
        .map(|caps| caps[1].to_string())
}
