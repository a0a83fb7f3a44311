//! Package manager binary discovery.
//!
//! [`BinaryLocator`] answers "is `name` usable on this host?" at most once per
//! name. Both positive and negative answers are memoized for the lifetime of the
//! locator: the installed toolset is assumed not to change during a run.

use std::path::PathBuf;

use moka::sync::Cache;
use tracing::{debug, trace, warn};

use crate::runner::{CommandRunner, Invocation};

/// What the locator currently knows about a binary name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryStatus {
    /// Not probed yet.
    Unresolved,
    /// Probed and found missing or broken.
    Absent,
    /// Probed and usable.
    Found(PathBuf),
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
}

/// Memoizing lookup of package manager executables.
///
/// Clones share the same cache. Entries are never evicted or invalidated.
/// Concurrent lookups of the same name are serialized by the cache, so the
/// sanity check for a given name runs at most once.
#[derive(Clone, Debug)]
pub struct BinaryLocator {
    cache: Cache<String, Option<PathBuf>>,
}

impl BinaryLocator {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    /// Resolves `name` to a usable executable path.
    ///
    /// The first lookup searches the command path and runs `<path> --version`.
    /// The binary counts as usable when that exits zero or with one of
    /// `accepted_exit_codes`. Every later lookup of `name` is answered from the
    /// cache without touching the filesystem.
    pub fn locate(
        &self,
        runner: &dyn CommandRunner,
        name: &str,
        accepted_exit_codes: &[i32],
    ) -> Option<PathBuf> {
        if let Some(cached) = self.cache.get(name) {
            trace!("Binary cache hit for {}", name);
            return cached;
        }
        self.cache.get_with(name.to_string(), || {
            Self::probe(runner, name, accepted_exit_codes)
        })
    }

    fn probe(runner: &dyn CommandRunner, name: &str, accepted_exit_codes: &[i32]) -> Option<PathBuf> {
        let Some(path) = runner.find(name) else {
            debug!("{} not found on PATH", name);
            return None;
        };

        match runner.run(&Invocation::new(&path).arg("--version")) {
            Ok(output) if output.success() => {
                debug!("Found usable {} at {}", name, path.display());
                Some(path)
            }
            Ok(output) => match output.code {
                Some(code) if accepted_exit_codes.contains(&code) => {
                    debug!(
                        "Found usable {} at {} (--version exited {})",
                        name,
                        path.display(),
                        code
                    );
                    Some(path)
                }
                code => {
                    debug!(
                        "Ignoring {} at {}: --version exited with {:?}",
                        name,
                        path.display(),
                        code
                    );
                    None
                }
            },
            Err(e) => {
                warn!("Ignoring {} at {}: {}", name, path.display(), e);
                None
            }
        }
    }

    /// Inspects the cache without probing.
    #[must_use]
    pub fn status(&self, name: &str) -> BinaryStatus {
        match self.cache.get(name) {
            None => BinaryStatus::Unresolved,
            Some(None) => BinaryStatus::Absent,
            Some(Some(path)) => BinaryStatus::Found(path),
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entries: self.cache.entry_count(),
        }
    }
}

impl Default for BinaryLocator {
    fn default() -> Self {
        Self::new()
    }
}
