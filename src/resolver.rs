//! The fallback chain that turns a file path into a [`Provides`] record.
//!
//! # Examples
//!
//! ```rust,no_run
//! use whichprovides::{ProvidesConfig, Resolver};
//! use std::path::Path;
//!
//! let resolver = Resolver::system(ProvidesConfig::default());
//! match resolver.resolve(Path::new("/bin/bash")) {
//!     Some(provides) => println!("{}", resolver.canonical_id(&provides)),
//!     None => println!("unknown"),
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::binaries::BinaryLocator;
use crate::configuration::ProvidesConfig;
use crate::distro::OsRelease;
use crate::probes::{self, Probe, ProbeContext, ProbeOutcome};
use crate::provides::Provides;
use crate::runner::{CommandRunner, SystemRunner};

/// Resolves file paths to the packages that own them.
///
/// Probes run strictly in order (apk, dpkg, rpm, apt) and the first match wins.
/// The distro is re-read on every call; binary lookups are memoized in the
/// [`BinaryLocator`] for the resolver's lifetime.
pub struct Resolver<R> {
    runner: R,
    config: ProvidesConfig,
    locator: BinaryLocator,
    probes: Vec<Box<dyn Probe + Send + Sync>>,
}

impl Resolver<SystemRunner> {
    /// A resolver that runs the host's real package managers.
    pub fn system(config: ProvidesConfig) -> Self {
        Self::new(SystemRunner, config)
    }
}

impl<R: CommandRunner> Resolver<R> {
    pub fn new(runner: R, config: ProvidesConfig) -> Self {
        Self::with_locator(runner, config, BinaryLocator::new())
    }

    /// Builds a resolver that shares `locator`'s binary cache.
    pub fn with_locator(runner: R, config: ProvidesConfig, locator: BinaryLocator) -> Self {
        let probes = probes::default_chain(&config.apt_file_accepted_exit_codes);
        Resolver {
            runner,
            config,
            locator,
            probes,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProvidesConfig {
        &self.config
    }

    #[must_use]
    pub fn locator(&self) -> &BinaryLocator {
        &self.locator
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Finds the package that owns `path`, or `None` if no probe could tell.
    pub fn resolve(&self, path: &Path) -> Option<Provides> {
        let os_release = OsRelease::load(&self.config.os_release_path);
        let Some(distro) = os_release.id() else {
            debug!(
                "No distro identifier in {}, skipping all probes",
                self.config.os_release_path.display()
            );
            return None;
        };
        trace!("Resolving {} on {}", path.display(), distro);

        for probe in &self.probes {
            match self.attempt(probe.as_ref(), distro, path) {
                ProbeOutcome::Match(provides) => {
                    info!("{} is provided by {} ({})", path.display(), provides, probe.name());
                    return Some(provides);
                }
                ProbeOutcome::Miss => debug!("{} did not attribute {}", probe.name(), path.display()),
                ProbeOutcome::Unavailable => trace!("{} is unavailable", probe.name()),
            }
        }

        debug!("No package provides {}", path.display());
        None
    }

    /// Runs a single probe, checking its prerequisites first.
    pub fn attempt(&self, probe: &dyn Probe, distro: &str, path: &Path) -> ProbeOutcome {
        let mut binaries: Vec<PathBuf> = Vec::with_capacity(probe.requirements().len());
        for requirement in probe.requirements() {
            match self.locator.locate(
                &self.runner,
                requirement.binary,
                &requirement.accepted_exit_codes,
            ) {
                Some(binary) => binaries.push(binary),
                None => return ProbeOutcome::Unavailable,
            }
        }

        let ctx = ProbeContext {
            runner: &self.runner,
            distro,
            binaries: &binaries,
        };
        match probe.query(&ctx, path) {
            Ok(Some(provides)) => ProbeOutcome::Match(provides),
            Ok(None) => ProbeOutcome::Miss,
            Err(e) => {
                debug!("{} probe failed ({}): {}", probe.name(), e.category(), e);
                ProbeOutcome::Miss
            }
        }
    }

    /// The canonical id of `provides`, with the configured distro qualifier.
    #[must_use]
    pub fn canonical_id(&self, provides: &Provides) -> String {
        provides.canonical_id_with_qualifier(self.config.qualifier())
    }
}
