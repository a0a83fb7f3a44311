use std::path::Path;

use tracing::debug;

use super::{capture, parse_version_field, Probe, ProbeContext, Requirement};
use crate::errors::Result;
use crate::provides::{PackageType, Provides};
use crate::runner::Invocation;

/// Debian's `dpkg`, querying the installed-package database.
#[derive(Debug, Clone)]
pub struct DpkgProbe {
    requirements: Vec<Requirement>,
}

impl DpkgProbe {
    pub fn new() -> Self {
        DpkgProbe {
            requirements: vec![Requirement::new("dpkg")],
        }
    }
}

impl Default for DpkgProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for DpkgProbe {
    fn name(&self) -> &'static str {
        "dpkg"
    }

    fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    fn query(&self, ctx: &ProbeContext<'_>, path: &Path) -> Result<Option<Provides>> {
        let dpkg = ctx.binary(0)?;

        // $ dpkg -S /bin/bash
        // bash: /bin/bash
        let search = Invocation::new(dpkg).arg("-S").arg(path);
        let Some(package_name) = capture(ctx.runner, &search)?.and_then(|out| parse_search(&out))
        else {
            return Ok(None);
        };

        // $ dpkg -s bash
        // ...
        // Version: 5.1-6ubuntu1.1
        let status = Invocation::new(dpkg).arg("-s").arg(&package_name);
        let Some(version) = capture(ctx.runner, &status)?.and_then(|out| parse_version_field(&out))
        else {
            debug!("dpkg knows {} but reported no version", package_name);
            return Ok(None);
        };

        Ok(Some(Provides::new(
            PackageType::Deb,
            Some(ctx.distro.to_string()),
            package_name,
            version,
        )))
    }
}

/// Parses the owning package out of `dpkg -S` output.
///
/// Diversion notices are skipped. When several packages share the path
/// (`a, b: /path`) the first is returned.
pub fn parse_search(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .filter(|line| !line.starts_with("diversion by "))
        .find_map(|line| {
            let (packages, _) = line.split_once(':')?;
            packages
                .split(", ")
                .next()
                .map(str::trim)
                .filter(|name| !name.is_empty() && !name.contains(char::is_whitespace))
                .map(String::from)
        })
}
