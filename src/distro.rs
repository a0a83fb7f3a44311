use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Default location of the OS identity file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

static OS_RELEASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?mR)^([A-Z0-9_]+)=(?:"([^"]*)"|(.*))$"#).expect("os-release pattern is valid")
});

/// Key/value pairs read from an os-release style file.
///
/// An empty mapping means the distro is unknown, which disables every probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    fields: HashMap<String, String>,
}

impl OsRelease {
    /// Reads and parses `path`. A missing or unreadable file yields an empty mapping.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!("Can't read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses `KEY=value` and `KEY="value"` lines. Anything else is ignored.
    pub fn parse(content: &str) -> Self {
        let mut fields = HashMap::new();
        for caps in OS_RELEASE_LINE.captures_iter(content) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            fields.insert(caps[1].to_string(), value.to_string());
        }
        trace!("Parsed {} os-release fields", fields.len());
        OsRelease { fields }
    }

    /// The distro identifier (`ID`), if present and non-empty.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("ID").filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
