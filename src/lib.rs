//! whichprovides - find the OS package that owns a file
//!
//! Given a file path, whichprovides asks the host's package manager which
//! installed package owns it and at what version. apk, dpkg, rpm and
//! apt/apt-file are supported behind one query, so callers (for example tools
//! auditing shared libraries bundled into redistributable artifacts) can
//! attribute a file to a distro package without knowing which package manager
//! the host uses.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use whichprovides::{ProvidesConfig, Resolver};
//! use std::path::Path;
//!
//! let resolver = Resolver::system(ProvidesConfig::default());
//! if let Some(provides) = resolver.resolve(Path::new("/usr/lib/libz.so.1")) {
//!     println!("{} {}", provides.package_name(), provides.package_version());
//!     println!("{}", provides.canonical_id());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`OsRelease`]: the distro identity read from `/etc/os-release`
//! - [`BinaryLocator`]: memoized discovery of package manager binaries
//! - [`probes`]: one probe per package manager, each with a pure output parser
//! - [`Resolver`]: runs the probes in order (apk, dpkg, rpm, apt) until one matches
//! - [`Provides`]: the resulting package identity
//!
//! # Error Handling
//!
//! [`Resolver::resolve`] never fails: a missing distro, missing tools, unowned
//! files and unparsable tool output all end in `None`. Lower-level operations
//! return [`Result<T>`] with [`ProvidesError`].
//!
//! # Concurrency
//!
//! Lookups are synchronous and run one probe at a time. The binary cache is
//! safe to share between threads; nothing bounds how long a package manager
//! may take to answer.

pub mod binaries;
pub mod configuration;
pub mod distro;
pub mod errors;
pub mod probes;
pub mod provides;
pub mod resolver;
pub mod runner;

// Re-export commonly used types
pub use binaries::{BinaryLocator, BinaryStatus};
pub use configuration::ProvidesConfig;
pub use distro::OsRelease;
pub use errors::{ProvidesError, Result};
pub use probes::ProbeOutcome;
pub use provides::{PackageType, Provides};
pub use resolver::Resolver;
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
