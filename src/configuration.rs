use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::distro::OS_RELEASE_PATH;
use crate::errors::Result;

/// Prefix of environment variables that override configuration, e.g.
/// `WHICHPROVIDES_OS_RELEASE_PATH`.
pub const ENV_PREFIX: &str = "WHICHPROVIDES";

/// Resolver settings.
///
/// Layered from built-in defaults, an optional TOML file, then `WHICHPROVIDES_*`
/// environment variables.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ProvidesConfig {
    /// The os-release file the distro identifier is read from.
    pub os_release_path: PathBuf,

    /// Appended to canonical ids as `?distro={qualifier}` when set.
    pub distro_qualifier: Option<String>,

    /// Non-zero `apt-file --version` exit codes that still count as installed.
    pub apt_file_accepted_exit_codes: Vec<i32>,
}

impl Default for ProvidesConfig {
    fn default() -> Self {
        ProvidesConfig {
            os_release_path: PathBuf::from(OS_RELEASE_PATH),
            distro_qualifier: None,
            apt_file_accepted_exit_codes: vec![2],
        }
    }
}

impl ProvidesConfig {
    /// Loads configuration from `file` (if given) and the environment.
    ///
    /// With `required` false a missing file is not an error.
    pub fn load_from(file: Option<&Path>, required: bool) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            debug!("Loading config from: {}", path.display());
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("apt_file_accepted_exit_codes"),
        );

        let config: ProvidesConfig = builder.build()?.try_deserialize()?;
        trace!("{:?}", config);
        Ok(config)
    }

    /// Loads configuration from a TOML string, on top of the defaults.
    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml_str, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// The qualifier to append to canonical ids, ignoring empty values.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.distro_qualifier.as_deref().filter(|q| !q.is_empty())
    }
}
