//! Where definitions are loaded from

use std::env;
use std::path::PathBuf;

/// Environment variable naming the unit definitions JSON file
pub const UNITS_FILE_ENV: &str = "GAUGE_UNITS_FILE";
/// Environment variable naming the alias text file
pub const ALIASES_FILE_ENV: &str = "GAUGE_ALIASES_FILE";

/// Definition sources. `None` selects the bundled data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    pub units_file: Option<PathBuf>,
    pub aliases_file: Option<PathBuf>,
}

impl LoaderConfig {
    /// Bundled definitions and aliases
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Read file overrides from `GAUGE_UNITS_FILE` and `GAUGE_ALIASES_FILE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; blank values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };
        LoaderConfig {
            units_file: path(UNITS_FILE_ENV),
            aliases_file: path(ALIASES_FILE_ENV),
        }
    }

    pub fn with_units_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.units_file = Some(path.into());
        self
    }

    pub fn with_aliases_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.aliases_file = Some(path.into());
        self
    }

    /// Overlay explicit settings from `other` onto this config
    pub fn merge(self, other: LoaderConfig) -> Self {
        LoaderConfig {
            units_file: other.units_file.or(self.units_file),
            aliases_file: other.aliases_file.or(self.aliases_file),
        }
    }
}
