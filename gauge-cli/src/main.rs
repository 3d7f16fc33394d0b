//! Gauge CLI
//!
//! Commands:
//! - convert: Convert a value between two unit symbols
//! - unit: Show a unit and its quantities
//! - quantity: Show a quantity and its members
//! - convertible: List units convertible with a unit
//! - can-convert: Check whether two units share a quantity
//! - summary: Registry counts and load diagnostics

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use gauge_core::Number;
use gauge_loader::{Loaded, Loader, LoaderConfig};
use gauge_units::UnitManager;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::command::{CliCommand, Commands};
use crate::output::{ConversionView, QuantityView, SummaryView, UnitReport, UnitView};

mod command;
mod output;

fn main() -> ExitCode {
    init_logging();
    let cli = CliCommand::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: CliCommand) -> anyhow::Result<()> {
    let flags = LoaderConfig {
        units_file: cli.units,
        aliases_file: cli.aliases,
    };
    let config = LoaderConfig::from_env().merge(flags);
    let Loaded { manager, report } = Loader::new(config)
        .load()
        .context("loading unit definitions")?;
    report.log();
    if cli.strict && !report.is_clean() {
        bail!("{} diagnostic(s) while loading unit definitions", report.len());
    }

    let text = match cli.command {
        Commands::Convert { value, from, to } => convert(&manager, &value, &from, &to, cli.json)?,
        Commands::Unit { symbol } => unit(&manager, &symbol, cli.json)?,
        Commands::Quantity { name } => {
            let Some(quantity) = manager.find_quantity(&name) else {
                bail!("unknown quantity '{}'", name);
            };
            if cli.json {
                output::json(&QuantityView::new(&manager, quantity))?
            } else {
                output::quantity_text(&manager, quantity)
            }
        }
        Commands::Convertible { symbol } => {
            if manager.find_unit(&symbol).is_none() {
                bail!("unknown unit '{}'", symbol);
            }
            let units = manager.find_convertible_units_by_symbol(&symbol);
            if cli.json {
                let views: Vec<UnitView<'_>> = units.into_iter().map(UnitView::from).collect();
                output::json(&views)?
            } else {
                output::units_text(&units)
            }
        }
        Commands::CanConvert { from, to } => {
            let convertible = manager.can_convert_by_symbol(&from, &to);
            if cli.json {
                output::json(&convertible)?
            } else {
                convertible.to_string()
            }
        }
        Commands::Summary => {
            if cli.json {
                output::json(&SummaryView {
                    quantities: manager.quantities().len(),
                    units: manager.units().len(),
                    aliases: manager.aliases().len(),
                    diagnostics: report.diagnostics(),
                })?
            } else {
                output::summary_text(&manager, report.diagnostics())
            }
        }
    };

    println!("{}", text);
    Ok(())
}

fn convert(manager: &UnitManager, value: &str, from: &str, to: &str, json: bool) -> anyhow::Result<String> {
    let value = Number::from_str(value).with_context(|| format!("invalid value '{}'", value))?;
    for symbol in [from, to] {
        if manager.find_unit(symbol).is_none() {
            warn!(symbol, "unknown unit, value is passed through unchanged");
        }
    }
    let result = manager
        .convert_by_symbol(from, to, &value)
        .with_context(|| format!("converting {} {} to {}", value, from, to))?;

    let view = ConversionView {
        value: &value,
        from,
        to,
        result: &result,
        approximate: result.to_f64(),
    };
    if json {
        output::json(&view)
    } else {
        Ok(output::conversion_text(&view, manager.display_symbol(to)))
    }
}

fn unit(manager: &UnitManager, symbol: &str, json: bool) -> anyhow::Result<String> {
    let Some(unit) = manager.find_unit(symbol) else {
        bail!("unknown unit '{}'", symbol);
    };
    let quantities = manager.find_quantities_by_unit(unit.id())?;
    let report = UnitReport {
        unit: UnitView::from(unit),
        quantity: manager.find_quantity_by_unit(unit.id())?.map(|q| q.name()),
        quantities: quantities.iter().map(|q| q.name()).collect(),
    };
    if json {
        output::json(&report)
    } else {
        Ok(output::unit_text(&report))
    }
}
