//! Text and JSON rendering of query results

use gauge_core::{Diagnostic, Number};
use gauge_units::{Quantity, UnitManager, UnitRef};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UnitView<'a> {
    pub name: &'a str,
    pub symbol: &'a str,
    pub display_symbol: &'a str,
    pub a: &'a Number,
    pub b: &'a Number,
    pub c: &'a Number,
    pub d: &'a Number,
}

impl<'a> From<UnitRef<'a>> for UnitView<'a> {
    fn from(unit: UnitRef<'a>) -> Self {
        let unit = unit.unit();
        UnitView {
            name: unit.name(),
            symbol: unit.symbol(),
            display_symbol: unit.display_symbol(),
            a: unit.a(),
            b: unit.b(),
            c: unit.c(),
            d: unit.d(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuantityView<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub base_unit: Option<&'a str>,
    pub units: Vec<&'a str>,
}

impl<'a> QuantityView<'a> {
    pub fn new(manager: &'a UnitManager, quantity: &'a Quantity) -> Self {
        QuantityView {
            name: quantity.name(),
            description: quantity.description(),
            base_unit: manager.base_unit(quantity).ok().map(|u| u.unit().symbol()),
            units: manager.quantity_units(quantity).map(|u| u.unit().symbol()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversionView<'a> {
    pub value: &'a Number,
    pub from: &'a str,
    pub to: &'a str,
    pub result: &'a Number,
    /// Lossy floating-point rendering for consumers without rationals
    pub approximate: f64,
}

#[derive(Debug, Serialize)]
pub struct UnitReport<'a> {
    pub unit: UnitView<'a>,
    pub quantity: Option<&'a str>,
    pub quantities: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView<'a> {
    pub quantities: usize,
    pub units: usize,
    pub aliases: usize,
    pub diagnostics: &'a [Diagnostic],
}

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn conversion_text(view: &ConversionView<'_>, display_symbol: &str) -> String {
    let symbol = if display_symbol.is_empty() { view.to } else { display_symbol };
    format!("{} {}", view.result, symbol).trim_end().to_string()
}

pub fn unit_text(report: &UnitReport<'_>) -> String {
    let unit = &report.unit;
    let mut lines = vec![
        format!("{} [{}]", unit.name, unit.symbol),
        format!("  display symbol: {}", unit.display_symbol),
        format!("  a={} b={} c={} d={}", unit.a, unit.b, unit.c, unit.d),
    ];
    if let Some(quantity) = report.quantity {
        lines.push(format!("  quantity: {}", quantity));
    }
    if report.quantities.len() > 1 {
        lines.push(format!("  member of: {}", report.quantities.join(", ")));
    }
    lines.join("\n")
}

pub fn quantity_text(manager: &UnitManager, quantity: &Quantity) -> String {
    let mut lines = vec![quantity.name().to_string()];
    if let Some(description) = quantity.description() {
        lines.push(format!("  {}", description));
    }
    let base = manager.base_unit(quantity).ok();
    for unit in manager.quantity_units(quantity) {
        let marker = if Some(unit) == base { " (base)" } else { "" };
        let in_base = match (base, unit.to_base(&Number::one())) {
            (Some(base), Ok(value)) => format!("1 {} = {} {}", unit.symbol(), value, base.symbol()),
            _ => format!("1 {} = undefined", unit.symbol()),
        };
        lines.push(format!("  {:<12} {}{}", unit.symbol(), in_base, marker));
    }
    lines.join("\n")
}

pub fn units_text(units: &[UnitRef<'_>]) -> String {
    units
        .iter()
        .map(|u| format!("{:<12} {}", u.symbol(), u.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary_text(manager: &UnitManager, diagnostics: &[Diagnostic]) -> String {
    let mut text = manager.to_string();
    if !diagnostics.is_empty() {
        text.push_str(&format!("\nDiagnostics...: {}", diagnostics.len()));
        for diagnostic in diagnostics {
            text.push_str(&format!("\n  {}", diagnostic));
        }
    }
    text
}
