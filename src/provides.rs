use serde::{Deserialize, Serialize};

/// The packaging format a [`Provides`] record was resolved from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Apk,
    Deb,
    Rpm,
}

impl PackageType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Apk => "apk",
            PackageType::Deb => "deb",
            PackageType::Rpm => "rpm",
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The package that owns a file, as reported by the host's package manager.
///
/// Records are immutable once built. The canonical identity string is derived
/// from the fields on demand and never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Provides {
    package_type: PackageType,
    distro: Option<String>,
    package_name: String,
    package_version: String,
}

impl Provides {
    pub fn new(
        package_type: PackageType,
        distro: Option<String>,
        package_name: impl Into<String>,
        package_version: impl Into<String>,
    ) -> Self {
        Provides {
            package_type,
            distro,
            package_name: package_name.into(),
            package_version: package_version.into(),
        }
    }

    #[must_use]
    pub fn package_type(&self) -> PackageType {
        self.package_type
    }

    #[must_use]
    pub fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Package-url style identity, `pkg:{type}/{distro/}{name}@{version}`.
    #[must_use]
    pub fn canonical_id(&self) -> String {
        let distro = match &self.distro {
            Some(distro) => format!("{distro}/"),
            None => String::new(),
        };
        format!(
            "pkg:{}/{}{}@{}",
            self.package_type, distro, self.package_name, self.package_version
        )
    }

    /// Same as [`canonical_id`](Self::canonical_id), with a `?distro=` qualifier
    /// appended when one is given.
    #[must_use]
    pub fn canonical_id_with_qualifier(&self, qualifier: Option<&str>) -> String {
        match qualifier {
            Some(q) if !q.is_empty() => format!("{}?distro={}", self.canonical_id(), q),
            _ => self.canonical_id(),
        }
    }
}

impl std::fmt::Display for Provides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.package_name, self.package_version, self.package_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(PackageType::Apk, Some("alpine"), "bash", "5.2.26-r0", "pkg:apk/alpine/bash@5.2.26-r0")]
    #[case(PackageType::Deb, Some("ubuntu"), "bash", "5.1-6ubuntu1.1", "pkg:deb/ubuntu/bash@5.1-6ubuntu1.1")]
    #[case(PackageType::Rpm, Some("almalinux"), "bash", "4.4.20-4.el8_6", "pkg:rpm/almalinux/bash@4.4.20-4.el8_6")]
    #[case(PackageType::Rpm, None, "glibc", "2.28-225.el8", "pkg:rpm/glibc@2.28-225.el8")]
    fn test_canonical_id(
        #[case] package_type: PackageType,
        #[case] distro: Option<&str>,
        #[case] name: &str,
        #[case] version: &str,
        #[case] expected: &str,
    ) {
        let provides = Provides::new(package_type, distro.map(String::from), name, version);
        assert_eq!(provides.canonical_id(), expected);
    }

    #[test]
    fn test_canonical_id_with_qualifier() {
        let provides = Provides::new(PackageType::Rpm, Some("almalinux".into()), "bash", "4.4.20-4.el8_6");
        assert_eq!(
            provides.canonical_id_with_qualifier(Some("almalinux-8")),
            "pkg:rpm/almalinux/bash@4.4.20-4.el8_6?distro=almalinux-8"
        );
        assert_eq!(
            provides.canonical_id_with_qualifier(None),
            provides.canonical_id()
        );
        assert_eq!(
            provides.canonical_id_with_qualifier(Some("")),
            provides.canonical_id()
        );
    }

    #[test]
    fn test_package_type_serializes_lowercase() {
        let json = serde_json::to_string(&PackageType::Deb).unwrap();
        assert_eq!(json, "\"deb\"");
    }

    #[test]
    fn test_display() {
        let provides = Provides::new(PackageType::Apk, Some("alpine".into()), "musl", "1.2.4-r2");
        assert_eq!(provides.to_string(), "musl 1.2.4-r2 (apk)");
    }
}
