//! Gauge Loader - Unit definitions, aliases and the shared registry
//!
//! Builds a [`UnitManager`] from a JSON definitions document and an
//! `alias=symbol` text file, either bundled with the crate or read from
//! disk. Problems with individual records land in a [`LoadReport`]; only an
//! unreadable or malformed definitions file is a [`LoadError`].

mod aliases;
mod config;
mod definitions;
mod report;
mod shared;

use std::fs;
use std::path::Path;

use gauge_core::{codes, Diagnostic};
use gauge_units::UnitManager;
use tracing::info;

pub use aliases::parse_aliases;
pub use config::{LoaderConfig, ALIASES_FILE_ENV, UNITS_FILE_ENV};
pub use definitions::{load_definitions, parse_coefficient, Coefficient, QuantityRecord, UnitRecord};
pub use report::{LoadError, LoadReport};
pub use shared::shared;

/// Bundled unit definitions
pub const BUNDLED_UNITS: &str = include_str!("../data/uom.json");
/// Bundled unit aliases
pub const BUNDLED_ALIASES: &str = include_str!("../data/unit_aliases.txt");

const BUNDLED_UNITS_ORIGIN: &str = "<bundled>/uom.json";
const BUNDLED_ALIASES_ORIGIN: &str = "<bundled>/unit_aliases.txt";

/// A populated registry and what went wrong while populating it
#[derive(Debug, Clone)]
pub struct Loaded {
    pub manager: UnitManager,
    pub report: LoadReport,
}

/// Loads definitions according to a [`LoaderConfig`]
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Loader { config }
    }

    pub fn bundled() -> Self {
        Self::new(LoaderConfig::bundled())
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn load(&self) -> Result<Loaded, LoadError> {
        let mut report = LoadReport::new();

        let (units_text, units_origin) = match &self.config.units_file {
            Some(path) => (read(path)?, path.display().to_string()),
            None => (BUNDLED_UNITS.to_string(), BUNDLED_UNITS_ORIGIN.to_string()),
        };

        // A missing alias file only costs the aliases
        let aliases = match &self.config.aliases_file {
            Some(path) => match read(path) {
                Ok(text) => Some((text, path.display().to_string())),
                Err(e) => {
                    report.push(
                        Diagnostic::warning(codes::ALIASES_UNAVAILABLE, e.to_string())
                            .with_suggestion("No unit aliases are available")
                            .in_source(path.display().to_string()),
                    );
                    None
                }
            },
            None => Some((BUNDLED_ALIASES.to_string(), BUNDLED_ALIASES_ORIGIN.to_string())),
        };

        let aliases = aliases.as_ref().map(|(text, origin)| (text.as_str(), origin.as_str()));
        let manager = Self::build(&units_text, &units_origin, aliases, &mut report)?;

        info!(
            quantities = manager.quantities().len(),
            aliases = manager.aliases().len(),
            warnings = report.warnings().count(),
            "loaded unit definitions from {}",
            units_origin
        );
        Ok(Loaded { manager, report })
    }

    /// Load from in-memory definitions and optional alias text
    pub fn load_str(definitions: &str, aliases: Option<&str>) -> Result<Loaded, LoadError> {
        let mut report = LoadReport::new();
        let aliases = aliases.map(|text| (text, "<memory>/aliases"));
        let manager = Self::build(definitions, "<memory>/definitions", aliases, &mut report)?;
        Ok(Loaded { manager, report })
    }

    fn build(
        definitions: &str,
        origin: &str,
        aliases: Option<(&str, &str)>,
        report: &mut LoadReport,
    ) -> Result<UnitManager, LoadError> {
        let table = match aliases {
            Some((text, alias_origin)) => parse_aliases(text, alias_origin, report),
            None => Default::default(),
        };
        let mut manager = UnitManager::new().with_aliases(table);
        load_definitions(&mut manager, definitions, origin, report)?;
        Ok(manager)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
