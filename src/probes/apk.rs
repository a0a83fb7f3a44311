use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{capture, Probe, ProbeContext, Requirement};
use crate::errors::Result;
use crate::provides::{PackageType, Provides};
use crate::runner::Invocation;

// The package name ends at the last hyphen that is followed by a digit;
// apk versions only contain a hyphen before the `-rN` revision.
static WHO_OWNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR) is owned by (\S+)-(\d\S*)[ \t]*$").expect("apk pattern is valid")
});

/// Alpine's `apk`.
#[derive(Debug, Clone)]
pub struct ApkProbe {
    requirements: Vec<Requirement>,
}

impl ApkProbe {
    pub fn new() -> Self {
        ApkProbe {
            requirements: vec![Requirement::new("apk")],
        }
    }
}

impl Default for ApkProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for ApkProbe {
    fn name(&self) -> &'static str {
        "apk"
    }

    fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    fn query(&self, ctx: &ProbeContext<'_>, path: &Path) -> Result<Option<Provides>> {
        // $ apk info --who-owns /bin/bash
        // /bin/bash is owned by bash-5.2.26-r0
        let invocation = Invocation::new(ctx.binary(0)?)
            .arg("info")
            .arg("--who-owns")
            .arg(path);
        let Some(stdout) = capture(ctx.runner, &invocation)? else {
            return Ok(None);
        };

        Ok(parse_who_owns(&stdout).map(|(name, version)| {
            Provides::new(PackageType::Apk, Some(ctx.distro.to_string()), name, version)
        }))
    }
}

/// Parses `apk info --who-owns` output into `(name, version)`.
pub fn parse_who_owns(stdout: &str) -> Option<(String, String)> {
    WHO_OWNS
        .captures(stdout)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}
