use std::path::Path;

use tracing::debug;

use super::{capture, parse_version_field, Probe, ProbeContext, Requirement};
use crate::errors::Result;
use crate::provides::{PackageType, Provides};
use crate::runner::Invocation;

/// `apt-file` plus `apt`, searching the full file-to-package index.
///
/// Slower than [`DpkgProbe`](super::DpkgProbe), so it runs last.
#[derive(Debug, Clone)]
pub struct AptProbe {
    requirements: Vec<Requirement>,
}

impl AptProbe {
    /// `apt_file_accepted_exit_codes` are the non-zero `apt-file --version`
    /// exits that still mean apt-file is installed (it exits 2 on some releases).
    pub fn new(apt_file_accepted_exit_codes: &[i32]) -> Self {
        AptProbe {
            requirements: vec![
                Requirement::new("apt"),
                Requirement::new("apt-file").accepting(apt_file_accepted_exit_codes),
            ],
        }
    }
}

impl Probe for AptProbe {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    fn query(&self, ctx: &ProbeContext<'_>, path: &Path) -> Result<Option<Provides>> {
        let (apt, apt_file) = (ctx.binary(0)?, ctx.binary(1)?);

        // $ apt-file search /usr/lib/x86_64-linux-gnu/libwebpdemux.so.2.0.9
        // libwebpdemux2: /usr/lib/x86_64-linux-gnu/libwebpdemux.so.2.0.9
        let search = Invocation::new(apt_file).arg("search").arg(path);
        let Some(package_name) = capture(ctx.runner, &search)?.and_then(|out| parse_search(&out))
        else {
            return Ok(None);
        };

        let show = Invocation::new(apt).arg("show").arg(&package_name);
        let Some(version) = capture(ctx.runner, &show)?.and_then(|out| parse_version_field(&out))
        else {
            debug!("apt show {} reported no version", package_name);
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

/// Parses the first `package: /path` line of `apt-file search` output.
pub fn parse_search(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let (name, _) = line.split_once(": ")?;
        let valid = !name.is_empty() && !name.contains(|c: char| c == ':' || c.is_whitespace());
        valid.then(|| name.to_string())
    })
}
