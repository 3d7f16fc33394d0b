use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Units-of-measure lookup and conversion
#[derive(Parser)]
#[command(name = "gauge")]
#[command(version, about = "Units-of-measure lookup and conversion", long_about = None)]
pub struct CliCommand {
    /// Unit definitions JSON file (defaults to GAUGE_UNITS_FILE, then the bundled data)
    #[arg(long, value_name = "FILE", global = true)]
    pub units: Option<PathBuf>,

    /// Unit alias file (defaults to GAUGE_ALIASES_FILE, then the bundled aliases)
    #[arg(long, value_name = "FILE", global = true)]
    pub aliases: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Fail when loading the definitions produced any diagnostic
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a value between two units; unknown symbols pass the value through
    Convert {
        /// Value to convert (decimal, scientific or fraction)
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Source unit symbol or alias
        from: String,
        /// Target unit symbol or alias
        to: String,
    },
    /// Show a unit and the quantities it belongs to
    Unit {
        symbol: String,
    },
    /// Show a quantity and its members
    Quantity {
        name: String,
    },
    /// List the units a unit can be converted to
    Convertible {
        symbol: String,
    },
    /// Check whether two units share a quantity
    CanConvert {
        from: String,
        to: String,
    },
    /// Registry counts and load diagnostics
    Summary,
}
