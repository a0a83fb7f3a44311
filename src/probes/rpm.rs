use std::path::Path;

use super::{capture, Probe, ProbeContext, Requirement};
use crate::errors::{ProvidesError, Result};
use crate::provides::{PackageType, Provides};
use crate::runner::Invocation;

const QUERY_FORMAT: &str = "%{NAME} %{VERSION} %{RELEASE} %{ARCH}";

/// `rpm`, as found on RHEL, CentOS, AlmaLinux, Rocky Linux, Fedora and SUSE.
#[derive(Debug, Clone)]
pub struct RpmProbe {
    requirements: Vec<Requirement>,
}

/// Fields of an `rpm -qf --queryformat` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmQuery {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: Option<String>,
}

impl RpmQuery {
    /// `{version}-{release}`, the form used for `package_version`.
    #[must_use]
    pub fn full_version(&self) -> String {
        format!("{}-{}", self.version, self.release)
    }
}

impl RpmProbe {
    pub fn new() -> Self {
        RpmProbe {
            requirements: vec![Requirement::new("rpm")],
        }
    }
}

impl Default for RpmProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for RpmProbe {
    fn name(&self) -> &'static str {
        "rpm"
    }

    fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    fn query(&self, ctx: &ProbeContext<'_>, path: &Path) -> Result<Option<Provides>> {
        // $ rpm -qf --queryformat "%{NAME} %{VERSION} %{RELEASE} %{ARCH}" /bin/bash
        // bash 4.4.20 4.el8_6 x86_64
        let invocation = Invocation::new(ctx.binary(0)?)
            .arg("-qf")
            .arg("--queryformat")
            .arg(QUERY_FORMAT)
            .arg(path);
        let Some(stdout) = capture(ctx.runner, &invocation)? else {
            return Ok(None);
        };

        let query = parse_query(&stdout)?;
        let version = query.full_version();
        Ok(Some(Provides::new(
            PackageType::Rpm,
            Some(ctx.distro.to_string()),
            query.name,
            version,
        )))
    }
}

/// Splits a queryformat answer into its fields.
///
/// Fewer than three fields is a malformed answer; the architecture is optional.
pub fn parse_query(stdout: &str) -> Result<RpmQuery> {
    let mut fields = stdout.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(version), Some(release)) => Ok(RpmQuery {
            name: name.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            arch: fields.next().map(String::from),
        }),
        _ => Err(ProvidesError::malformed_output(
            "rpm",
            format!("expected NAME VERSION RELEASE, got {:?}", stdout.trim()),
        )),
    }
}
