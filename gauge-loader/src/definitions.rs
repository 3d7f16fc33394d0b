//! JSON unit and quantity definitions

use std::collections::HashMap;

use gauge_core::{codes, Diagnostic, Number, NumberError};
use gauge_units::{Quantity, Unit, UnitId, UnitManager};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{LoadError, LoadReport};

/// Decimal expansion used for the named `PI` coefficients
const PI_DIGITS: &str = "3.14159265358979323846264338327950288";

/// Top-level document. Records stay untyped until each one is checked,
/// so a single bad record does not reject the file.
#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    units: Vec<JsonValue>,
    #[serde(default)]
    quantities: Vec<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub a: Option<Coefficient>,
    #[serde(default)]
    pub b: Option<Coefficient>,
    #[serde(default)]
    pub c: Option<Coefficient>,
    #[serde(default)]
    pub d: Option<Coefficient>,
    #[serde(default, alias = "display_symbol")]
    pub display_symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the member inserted as base unit; otherwise the first member
    #[serde(default, alias = "base_unit")]
    pub base_unit: Option<String>,
    #[serde(default)]
    pub units: Vec<String>,
}

/// A coefficient as written in the definitions: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Number(serde_json::Number),
    Text(String),
}

impl Coefficient {
    pub fn to_number(&self) -> Result<Number, NumberError> {
        match self {
            Coefficient::Number(n) => Number::from_str(&n.to_string()),
            Coefficient::Text(s) => parse_coefficient(s),
        }
    }
}

/// Parse a textual coefficient, accepting `PI`, `2*PI` and `4*PI`
pub fn parse_coefficient(text: &str) -> Result<Number, NumberError> {
    let text = text.trim();
    let factor = match text {
        "PI" => 1,
        "2*PI" => 2,
        "4*PI" => 4,
        _ => return Number::from_str(text),
    };
    Ok(Number::from_str(PI_DIGITS)?.mul(&Number::from_i64(factor)))
}

fn coefficient(value: &Option<Coefficient>, default: i64) -> Result<Number, NumberError> {
    match value {
        Some(c) => c.to_number(),
        None => Ok(Number::from_i64(default)),
    }
}

impl UnitRecord {
    pub fn to_unit(&self) -> Result<Unit, NumberError> {
        let unit = Unit::new(
            &self.name,
            &self.symbol,
            coefficient(&self.a, 1)?,
            coefficient(&self.b, 0)?,
            coefficient(&self.c, 0)?,
            coefficient(&self.d, 1)?,
        );
        Ok(match &self.display_symbol {
            Some(display) => unit.with_display_symbol(display),
            None => unit,
        })
    }
}

/// Parse a definitions document and add its units and quantities to
/// `manager`. Record-level problems are reported, not returned.
pub fn load_definitions(
    manager: &mut UnitManager,
    text: &str,
    origin: &str,
    report: &mut LoadReport,
) -> Result<(), LoadError> {
    let document: Document = serde_json::from_str(text).map_err(|error| LoadError::Json {
        origin: origin.to_string(),
        error,
    })?;

    let by_name = load_units(manager, document.units, origin, report);
    load_quantities(manager, document.quantities, &by_name, origin, report);
    Ok(())
}

fn load_units(
    manager: &mut UnitManager,
    records: Vec<JsonValue>,
    origin: &str,
    report: &mut LoadReport,
) -> HashMap<String, UnitId> {
    let mut by_name: HashMap<String, UnitId> = HashMap::new();

    for (index, value) in records.into_iter().enumerate() {
        let record: UnitRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                report.push(
                    Diagnostic::warning(codes::INVALID_RECORD, format!("units[{}]: {}", index, e))
                        .in_source(origin),
                );
                continue;
            }
        };

        if by_name.contains_key(&record.name) {
            report.push(Diagnostic::duplicate_unit(&record.name).in_source(origin).for_record(&record.name));
            continue;
        }

        match record.to_unit() {
            Ok(unit) => {
                let id = manager.register_unit(unit);
                by_name.insert(record.name, id);
            }
            Err(e) => report.push(
                Diagnostic::warning(
                    codes::INVALID_COEFFICIENT,
                    format!("Invalid coefficient in unit '{}': {}", record.name, e),
                )
                .with_suggestion("Use a decimal, a fraction, PI, 2*PI or 4*PI")
                .in_source(origin)
                .for_record(&record.name),
            ),
        }
    }

    debug!(origin, units = by_name.len(), "registered units");
    by_name
}

fn load_quantities(
    manager: &mut UnitManager,
    records: Vec<JsonValue>,
    by_name: &HashMap<String, UnitId>,
    origin: &str,
    report: &mut LoadReport,
) {
    for (index, value) in records.into_iter().enumerate() {
        let record: QuantityRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                report.push(
                    Diagnostic::warning(codes::INVALID_RECORD, format!("quantities[{}]: {}", index, e))
                        .in_source(origin),
                );
                continue;
            }
        };

        if manager.find_quantity(&record.name).is_some() {
            report.push(
                Diagnostic::duplicate_quantity(&record.name)
                    .in_source(origin)
                    .for_record(&record.name),
            );
            continue;
        }

        let mut quantity = Quantity::new(&record.name);
        if let Some(description) = &record.description {
            quantity = quantity.with_description(description);
        }

        let mut has_base = false;
        for member in &record.units {
            let Some(&id) = by_name.get(member) else {
                report.push(
                    Diagnostic::unknown_unit(member)
                        .in_source(origin)
                        .for_record(&record.name)
                        .with_note(format!("member of quantity '{}'", record.name)),
                );
                continue;
            };
            let is_base = record.base_unit.as_deref() == Some(member.as_str());
            has_base |= is_base;
            quantity.add_unit(id, is_base);
        }

        if let Some(base) = &record.base_unit {
            if !has_base {
                report.push(
                    Diagnostic::warning(
                        codes::INVALID_BASE_UNIT,
                        format!("Base unit '{}' is not a member of quantity '{}'", base, record.name),
                    )
                    .with_suggestion("The first listed member is used as base unit")
                    .in_source(origin)
                    .for_record(&record.name),
                );
            }
        }

        if let Err(e) = manager.add_quantity(quantity) {
            report.push(
                Diagnostic::warning(codes::INVALID_RECORD, e.to_string())
                    .in_source(origin)
                    .for_record(&record.name),
            );
        }
    }
}
