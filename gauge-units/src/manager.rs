//! Unit registry: lookup, convertibility and conversion

use std::fmt;
use std::ops::Deref;

use gauge_core::Number;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AliasTable, Quantity, Unit, UnitError};

/// Symbol looked up when an empty symbol is requested
pub const UNITLESS_SYMBOL: &str = "unitless";
/// Symbol of the Euclidean marker unit
pub const EUCLID_SYMBOL: &str = "Euc";
pub const DIMENSIONLESS_QUANTITY: &str = "dimensionless";
pub const TIME_QUANTITY: &str = "time";

/// Stable index of a unit inside one [`UnitManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    pub const fn new(index: usize) -> Self {
        UnitId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit borrowed from a registry together with its id.
///
/// Dereferences to [`Unit`]. Two refs are equal when they point at the
/// same arena slot; use [`UnitRef::unit`] for structural comparison.
#[derive(Debug, Clone, Copy)]
pub struct UnitRef<'a> {
    id: UnitId,
    unit: &'a Unit,
}

impl<'a> UnitRef<'a> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn unit(&self) -> &'a Unit {
        self.unit
    }
}

impl Deref for UnitRef<'_> {
    type Target = Unit;

    fn deref(&self) -> &Unit {
        self.unit
    }
}

impl PartialEq for UnitRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UnitRef<'_> {}

/// Registry of units, quantities and aliases.
///
/// Quantities are kept in insertion order; every search walks them in that
/// order, so resolution is deterministic for a given load sequence.
///
/// Operations taking a [`UnitId`] are strict and fail with
/// [`UnitError::InvalidArgument`] for ids foreign to this registry. The
/// `*_by_symbol` variants are lenient and degrade to empty results.
#[derive(Debug, Clone, Default)]
pub struct UnitManager {
    units: Vec<Unit>,
    quantities: Vec<Quantity>,
    aliases: AliasTable,
}

impl UnitManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: replace the alias table
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    // ========== Arena ==========

    /// Add a unit to the arena. The unit is not a member of any quantity
    /// until a quantity referencing the returned id is added.
    pub fn register_unit(&mut self, unit: Unit) -> UnitId {
        self.units.push(unit);
        UnitId(self.units.len() - 1)
    }

    pub fn unit(&self, id: UnitId) -> Option<UnitRef<'_>> {
        self.units.get(id.0).map(|unit| UnitRef { id, unit })
    }

    /// Mutable access for administrative coefficient overrides
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    fn resolve(&self, id: UnitId) -> Result<UnitRef<'_>, UnitError> {
        self.unit(id)
            .ok_or_else(|| UnitError::invalid(format!("unit {} is not registered", id)))
    }

    /// Units that belong to at least one quantity, each once, in quantity order.
    ///
    /// Membership is by id, not by name: a unit shared by several
    /// quantities is listed once, while two registrations that happen to
    /// share a name are both listed.
    pub fn units(&self) -> Vec<UnitRef<'_>> {
        let mut seen: Vec<UnitRef<'_>> = Vec::new();
        for unit in self.members() {
            if !seen.contains(&unit) {
                seen.push(unit);
            }
        }
        seen
    }

    fn members(&self) -> impl Iterator<Item = UnitRef<'_>> + '_ {
        self.quantities.iter().flat_map(move |q| self.quantity_units(q))
    }

    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    // ========== Quantities ==========

    pub fn add_quantity(&mut self, quantity: Quantity) -> Result<(), UnitError> {
        if quantity.name().trim().is_empty() {
            return Err(UnitError::invalid("quantity name cannot be blank"));
        }
        if self.find_quantity(quantity.name()).is_some() {
            return Err(UnitError::DuplicateQuantity(quantity.name().to_string()));
        }
        if let Some(foreign) = quantity.units().iter().find(|id| self.unit(**id).is_none()) {
            return Err(UnitError::invalid(format!(
                "quantity '{}' references unregistered unit {}",
                quantity.name(),
                foreign
            )));
        }
        debug!(quantity = quantity.name(), units = quantity.len(), "added quantity");
        self.quantities.push(quantity);
        Ok(())
    }

    pub fn find_quantity(&self, name: &str) -> Option<&Quantity> {
        self.quantities.iter().find(|q| q.name() == name)
    }

    /// Existing quantity with this name, or a new empty one
    pub fn find_or_create_quantity(&mut self, name: &str) -> Result<&mut Quantity, UnitError> {
        if name.trim().is_empty() {
            return Err(UnitError::invalid("quantity name cannot be blank"));
        }
        let index = match self.quantities.iter().position(|q| q.name() == name) {
            Some(index) => index,
            None => {
                self.quantities.push(Quantity::new(name));
                self.quantities.len() - 1
            }
        };
        Ok(&mut self.quantities[index])
    }

    pub fn base_unit(&self, quantity: &Quantity) -> Result<UnitRef<'_>, UnitError> {
        self.resolve(quantity.base_unit()?)
    }

    /// Members of `quantity` in order, as registry refs
    pub fn quantity_units<'a>(&'a self, quantity: &'a Quantity) -> impl Iterator<Item = UnitRef<'a>> + 'a {
        quantity.units().iter().filter_map(move |id| self.unit(*id))
    }

    // ========== Symbols ==========

    pub fn add_unit_alias(&mut self, alias: &str, symbol: &str) -> Result<(), UnitError> {
        self.aliases.insert(alias, symbol)?;
        Ok(())
    }

    /// Resolve a symbol or alias to a unit.
    ///
    /// A blank symbol means [`UNITLESS_SYMBOL`]. Aliases are matched
    /// case-insensitively; symbols are matched exactly first, then
    /// case-insensitively. The first match in quantity order wins.
    pub fn find_unit(&self, symbol: &str) -> Option<UnitRef<'_>> {
        let symbol = if symbol.trim().is_empty() { UNITLESS_SYMBOL } else { symbol };
        let lowered = AliasTable::normalize(symbol);
        let target = match self.aliases.resolve(&lowered) {
            Some(canonical) => {
                debug!(alias = symbol, symbol = canonical, "resolved unit alias");
                canonical
            }
            None => symbol,
        };

        if let Some(unit) = self.members().find(|u| u.symbol() == target) {
            return Some(unit);
        }
        self.members().find(|u| u.symbol().to_lowercase() == lowered)
    }

    /// Display symbol of the unit `symbol` resolves to, or `""`
    pub fn display_symbol(&self, symbol: &str) -> &str {
        self.find_unit(symbol)
            .map(|u| u.unit().display_symbol())
            .unwrap_or("")
    }

    // ========== Typed queries ==========

    /// Every unit sharing a quantity with `unit`, excluding `unit` itself.
    ///
    /// De-duplicated by structural equality, so distinct registrations of
    /// an identical unit are reported once.
    pub fn find_convertible_units(&self, unit: UnitId) -> Result<Vec<UnitRef<'_>>, UnitError> {
        let target = self.resolve(unit)?;
        let mut convertible: Vec<UnitRef<'_>> = Vec::new();
        for quantity in self.quantities.iter().filter(|q| q.contains(unit)) {
            for member in self.quantity_units(quantity) {
                if member.unit() == target.unit() {
                    continue;
                }
                if !convertible.iter().any(|c| c.unit() == member.unit()) {
                    convertible.push(member);
                }
            }
        }
        Ok(convertible)
    }

    /// Every quantity containing `unit`, in registry order.
    pub fn find_quantities_by_unit(&self, unit: UnitId) -> Result<Vec<&Quantity>, UnitError> {
        self.resolve(unit)?;
        let mut found: Vec<&Quantity> = self.quantities.iter().filter(|q| q.contains(unit)).collect();

        // Data-driven special case: a quantity carrying the Euclidean marker
        // unit is also dimensionless. Appended once, even when "dimensionless"
        // is already in the list.
        if let Some(euclid) = self.find_unit(EUCLID_SYMBOL) {
            if found.iter().any(|q| q.contains(euclid.id())) {
                if let Some(dimensionless) = self.find_quantity(DIMENSIONLESS_QUANTITY) {
                    found.push(dimensionless);
                }
            }
        }
        Ok(found)
    }

    /// The single quantity `unit` is best described by
    pub fn find_quantity_by_unit(&self, unit: UnitId) -> Result<Option<&Quantity>, UnitError> {
        let found = self.find_quantities_by_unit(unit)?;
        // Data-driven special case: units shared with "time" resolve to it.
        // Any other ambiguity falls back to registry order.
        if found.len() > 1 && found.iter().any(|q| q.name() == TIME_QUANTITY) {
            return Ok(self.find_quantity(TIME_QUANTITY));
        }
        Ok(found.first().copied())
    }

    /// True when the two units share at least one quantity
    pub fn can_convert(&self, first: UnitId, second: UnitId) -> Result<bool, UnitError> {
        let first = self.find_quantities_by_unit(first)?;
        let second = self.find_quantities_by_unit(second)?;
        Ok(first.iter().any(|q| second.iter().any(|other| other.name() == q.name())))
    }

    /// Convert `value` from one unit to another through the base unit.
    ///
    /// No compatibility check is made: converting between units of
    /// unrelated quantities yields a meaningless number. Use
    /// [`can_convert`](Self::can_convert) first when that matters.
    pub fn convert(&self, from: UnitId, to: UnitId, value: &Number) -> Result<Number, UnitError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        to.from_base(&from.to_base(value)?)
    }

    /// Resolve both symbols and convert; unknown symbols are an error
    pub fn convert_symbols(&self, from: &str, to: &str, value: &Number) -> Result<Number, UnitError> {
        let from = self
            .find_unit(from)
            .ok_or_else(|| UnitError::invalid(format!("unknown unit symbol '{}'", from)))?;
        let to = self
            .find_unit(to)
            .ok_or_else(|| UnitError::invalid(format!("unknown unit symbol '{}'", to)))?;
        self.convert(from.id(), to.id(), value)
    }

    // ========== Lenient symbol queries ==========

    pub fn find_convertible_units_by_symbol(&self, symbol: &str) -> Vec<UnitRef<'_>> {
        self.find_unit(symbol)
            .and_then(|u| self.find_convertible_units(u.id()).ok())
            .unwrap_or_default()
    }

    pub fn find_quantities_by_symbol(&self, symbol: &str) -> Vec<&Quantity> {
        self.find_unit(symbol)
            .and_then(|u| self.find_quantities_by_unit(u.id()).ok())
            .unwrap_or_default()
    }

    pub fn find_quantity_by_symbol(&self, symbol: &str) -> Option<&Quantity> {
        self.find_unit(symbol)
            .and_then(|u| self.find_quantity_by_unit(u.id()).ok())
            .flatten()
    }

    pub fn can_convert_by_symbol(&self, first: &str, second: &str) -> bool {
        match (self.find_unit(first), self.find_unit(second)) {
            (Some(a), Some(b)) => self.can_convert(a.id(), b.id()).unwrap_or(false),
            _ => false,
        }
    }

    /// Convert between symbols, returning `value` unchanged when either
    /// symbol is unknown. Arithmetic failures still propagate.
    pub fn convert_by_symbol(&self, from: &str, to: &str, value: &Number) -> Result<Number, UnitError> {
        match (self.find_unit(from), self.find_unit(to)) {
            (Some(a), Some(b)) => self.convert(a.id(), b.id(), value),
            _ => {
                debug!(from, to, "unresolved unit symbol, value passed through");
                Ok(value.clone())
            }
        }
    }
}

impl fmt::Display for UnitManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: usize = self.quantities.iter().map(Quantity::len).sum();
        writeln!(f, "Quantities....: {}", self.quantities.len())?;
        writeln!(f, "Units.........: {}", members)?;
        write!(f, "Unit aliases..: {}", self.aliases.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn linear(name: &str, symbol: &str, a: &str, d: &str) -> Unit {
        Unit::new(name, symbol, n(a), Number::zero(), Number::zero(), n(d))
    }

    fn quantity(name: &str, members: &[UnitId]) -> Quantity {
        let mut q = Quantity::new(name);
        for id in members {
            q.add_unit(*id, false);
        }
        q
    }

    fn names(quantities: &[&Quantity]) -> Vec<String> {
        quantities.iter().map(|q| q.name().to_string()).collect()
    }

    fn symbols(units: &[UnitRef<'_>]) -> Vec<String> {
        units.iter().map(|u| u.symbol().to_string()).collect()
    }

    /// Small reference registry. "period" is registered before "time" and
    /// shares its units; "Euc" is shared by "dimensionless" and
    /// "volume per volume".
    fn fixture() -> UnitManager {
        let mut m = UnitManager::new();

        let metre = m.register_unit(linear("metre", "m", "1", "1"));
        let km = m.register_unit(linear("kilometre", "km", "1000", "1"));
        let ft = m.register_unit(linear("foot", "ft", "0.3048", "1"));
        let mi = m.register_unit(linear("mile", "mi", "1609.344", "1"));
        let inch = m.register_unit(linear("inch", "in", "0.0254", "1"));
        let cm = m.register_unit(linear("centimetre", "cm", "0.01", "1"));
        m.add_quantity(quantity("length", &[metre, km, ft, mi, inch, cm])).unwrap();

        let s = m.register_unit(linear("second", "s", "1", "1"));
        let ms = m.register_unit(linear("millisecond", "ms", "0.001", "1"));
        m.add_quantity(quantity("period", &[s, ms])).unwrap();
        let min = m.register_unit(linear("minute", "min", "60", "1"));
        let h = m.register_unit(linear("hour", "h", "3600", "1"));
        let d = m.register_unit(linear("day", "d", "86400", "1"));
        m.add_quantity(quantity("time", &[s, ms, min, h, d])).unwrap();

        let mps = m.register_unit(linear("metre per second", "m/s", "1", "1"));
        let kmh = m.register_unit(linear("kilometre per hour", "km/h", "1000", "3600"));
        let mph = m.register_unit(linear("mile per hour", "mi/h", "1609.344", "3600"));
        let fps = m.register_unit(linear("foot per second", "ft/s", "0.3048", "1"));
        m.add_quantity(quantity("velocity", &[mps, kmh, mph, fps])).unwrap();

        let ohm_m = m.register_unit(linear("ohm metre", "ohm.m", "1", "1").with_display_symbol("Ω·m"));
        let ohm_cm = m.register_unit(linear("ohm centimetre", "ohm.cm", "0.01", "1"));
        let kohm_m = m.register_unit(linear("kiloohm metre", "kohm.m", "1000", "1"));
        m.add_quantity(quantity("electrical resistivity", &[ohm_m, ohm_cm, kohm_m])).unwrap();

        let siemens = m.register_unit(linear("siemens", "S", "1", "1"));
        let msiemens = m.register_unit(linear("millisiemens", "mS", "0.001", "1"));
        m.add_quantity(quantity("electrical conductance", &[siemens, msiemens])).unwrap();

        let euc = m.register_unit(linear("euclid", "Euc", "1", "1"));
        let unitless = m.register_unit(linear("unitless", "unitless", "1", "1"));
        m.add_quantity(quantity("dimensionless", &[euc, unitless])).unwrap();
        let percent = m.register_unit(linear("percent", "%", "1", "100"));
        let ppm = m.register_unit(linear("part per million", "ppm", "1", "1000000"));
        m.add_quantity(quantity("volume per volume", &[euc, percent, ppm])).unwrap();

        let hz = m.register_unit(linear("hertz", "Hz", "1", "1"));
        let khz = m.register_unit(linear("kilohertz", "kHz", "1000", "1"));
        let rpm = m.register_unit(linear("revolution per minute", "rpm", "1", "60"));
        let period = m.register_unit(Unit::new(
            "second per cycle",
            "s/cycle",
            Number::zero(),
            Number::one(),
            Number::one(),
            Number::zero(),
        ));
        m.add_quantity(quantity("frequency", &[hz, khz, rpm, period])).unwrap();

        let kelvin = m.register_unit(linear("kelvin", "K", "1", "1"));
        let celsius = m.register_unit(Unit::with_offset("degree Celsius", "degC", Number::one(), n("273.15")));
        let fahrenheit = m.register_unit(Unit::new(
            "degree Fahrenheit",
            "degF",
            n("5"),
            n("2298.35"),
            Number::zero(),
            n("9"),
        ));
        let rankine = m.register_unit(linear("degree Rankine", "degR", "5", "9"));
        m.add_quantity(quantity("temperature", &[kelvin, celsius, fahrenheit, rankine])).unwrap();

        for (alias, symbol) in [
            ("mph", "mi/h"),
            ("KPH", "km/h"),
            ("sec", "s"),
            ("meter", "m"),
            ("siemens", "S"),
            ("percent", "%"),
        ] {
            m.add_unit_alias(alias, symbol).unwrap();
        }
        m
    }

    fn id(m: &UnitManager, symbol: &str) -> UnitId {
        m.find_unit(symbol).unwrap().id()
    }

    const FOREIGN: UnitId = UnitId::new(9999);

    // ========== Reference scenarios ==========

    #[test]
    fn test_length_base_unit() {
        let m = fixture();
        let length = m.find_quantity("length").unwrap();
        assert_eq!(m.base_unit(length).unwrap().symbol(), "m");
    }

    #[test]
    fn test_find_unit_by_symbol() {
        let m = fixture();
        assert_eq!(m.find_unit("ohm.m").unwrap().name(), "ohm metre");
    }

    #[test]
    fn test_resistivity_has_single_quantity() {
        let m = fixture();
        let found = m.find_quantities_by_unit(id(&m, "ohm.m")).unwrap();
        assert_eq!(names(&found), vec!["electrical resistivity"]);
    }

    #[test]
    fn test_convert_miles_per_hour() {
        let m = fixture();
        let result = m.convert(id(&m, "mi/h"), id(&m, "km/h"), &n("55")).unwrap();
        assert_eq!(result, n("88.51392"));

        let result = m.convert_symbols("mi/h", "km/h", &Number::from_f64(55.0).unwrap()).unwrap();
        assert_eq!(result.to_string(), "88.51392");
    }

    #[test]
    fn test_convertible_contains_metre_per_second() {
        let m = fixture();
        let convertible = m.find_convertible_units(id(&m, "mi/h")).unwrap();
        assert!(convertible.iter().any(|u| u.name() == "metre per second" && u.symbol() == "m/s"));
        assert!(!convertible.iter().any(|u| u.symbol() == "mi/h"));
    }

    #[test]
    fn test_can_convert() {
        let m = fixture();
        assert!(m.can_convert(id(&m, "mi/h"), id(&m, "m/s")).unwrap());
        assert!(!m.can_convert(id(&m, "mi/h"), id(&m, "ohm.m")).unwrap());
    }

    // ========== Properties ==========

    #[test]
    fn test_round_trip_all_units() {
        let m = fixture();
        let values = ["0", "1", "-1", "-273.15", "1e9", "0.000123"];
        for unit in m.units() {
            if !unit.is_invertible() {
                continue;
            }
            for v in values {
                let x = n(v);
                // Reciprocal units cannot take their pole
                let Ok(base) = unit.to_base(&x) else { continue };
                assert_eq!(unit.from_base(&base).unwrap(), x, "round trip {} of {}", unit.symbol(), v);
            }
        }
    }

    #[test]
    fn test_base_identity() {
        let m = fixture();
        let x = n("42.125");
        for quantity in m.quantities() {
            let base = m.base_unit(quantity).unwrap();
            assert!(base.is_base_identity(), "{} base is not identity", quantity.name());
            assert_eq!(base.to_base(&x).unwrap(), x);
            assert_eq!(base.from_base(&x).unwrap(), x);
        }
    }

    #[test]
    fn test_convertibility_is_symmetric() {
        let m = fixture();
        let units = m.units();
        for a in &units {
            for b in &units {
                assert_eq!(
                    m.can_convert(a.id(), b.id()).unwrap(),
                    m.can_convert(b.id(), a.id()).unwrap(),
                    "{} vs {}",
                    a.symbol(),
                    b.symbol()
                );
            }
        }
    }

    #[test]
    fn test_alias_transparency() {
        let m = fixture();
        for (alias, symbol) in m.aliases().iter() {
            assert_eq!(m.find_unit(alias), m.find_unit(symbol), "alias {}", alias);
            assert!(m.find_unit(alias).is_some());
        }
    }

    #[test]
    fn test_find_unit_is_deterministic() {
        let m = fixture();
        for input in ["KM/H", "km/h", " km/h ", "Mph", "MPH ", "ms", "MS"] {
            assert_eq!(m.find_unit(input), m.find_unit(input));
        }
        assert_eq!(m.find_unit("KM/H"), m.find_unit(" km/h "));
        assert_eq!(m.find_unit("Mph"), m.find_unit("mi/h"));
    }

    // ========== find_unit ==========

    #[test]
    fn test_find_unit_blank_is_unitless() {
        let m = fixture();
        assert_eq!(m.find_unit("").unwrap().symbol(), "unitless");
        assert_eq!(m.find_unit("   ").unwrap().symbol(), "unitless");
    }

    #[test]
    fn test_find_unit_exact_before_case_insensitive() {
        let m = fixture();
        assert_eq!(m.find_unit("mS").unwrap().name(), "millisiemens");
        assert_eq!(m.find_unit("S").unwrap().name(), "siemens");
        assert_eq!(m.find_unit("s").unwrap().name(), "second");
        // No exact match: first case-insensitive hit in quantity order
        assert_eq!(m.find_unit("MS").unwrap().name(), "millisecond");
    }

    #[test]
    fn test_find_unit_aliases() {
        let m = fixture();
        assert_eq!(m.find_unit("kph").unwrap().symbol(), "km/h");
        assert_eq!(m.find_unit("SIEMENS").unwrap().symbol(), "S");
        assert_eq!(m.find_unit(" Meter ").unwrap().symbol(), "m");
    }

    #[test]
    fn test_find_unit_whitespace_falls_back_to_trimmed() {
        let m = fixture();
        assert_eq!(m.find_unit(" m ").unwrap().name(), "metre");
    }

    #[test]
    fn test_find_unit_unknown() {
        let m = fixture();
        assert!(m.find_unit("furlong").is_none());
    }

    #[test]
    fn test_find_unit_alias_target_is_case_sensitive() {
        let mut m = fixture();
        m.add_unit_alias("Speed", "M/S").unwrap();
        // "M/S" matches no symbol exactly and the fallback compares
        // against the lowered input "speed", not the alias target
        assert!(m.find_unit("SPEED").is_none());
        assert!(m.find_unit("speed").is_none());
    }

    #[test]
    fn test_find_unit_alias_trims_and_ignores_case() {
        let mut m = fixture();
        m.add_unit_alias("fast", "m/s").unwrap();
        assert_eq!(m.find_unit("  FAST ").unwrap().id(), id(&m, "m/s"));
        assert_eq!(m.find_unit("Fast").unwrap().name(), "metre per second");
    }

    #[test]
    fn test_find_unit_shared_unit_has_one_id() {
        let m = fixture();
        let time = m.find_quantity("time").unwrap();
        let period = m.find_quantity("period").unwrap();
        let s = id(&m, "s");
        assert!(time.contains(s));
        assert!(period.contains(s));
    }

    // ========== Quantities ==========

    #[test]
    fn test_units_lists_each_id_once() {
        let m = fixture();
        let units = m.units();
        assert_eq!(units.iter().filter(|u| u.symbol() == "s").count(), 1);
        assert_eq!(units.iter().filter(|u| u.symbol() == "Euc").count(), 1);
    }

    #[test]
    fn test_units_keeps_registrations_sharing_a_name() {
        let mut m = UnitManager::new();
        let metre = m.register_unit(linear("metre", "m", "1", "1"));
        let survey = m.register_unit(linear("metre", "m_survey", "1", "1"));
        m.add_quantity(quantity("length", &[metre])).unwrap();
        m.add_quantity(quantity("survey length", &[survey])).unwrap();

        let units = m.units();
        assert_eq!(symbols(&units), vec!["m", "m_survey"]);
        assert!(units.iter().all(|u| u.name() == "metre"));
    }

    #[test]
    fn test_time_tie_break() {
        let m = fixture();
        let found = m.find_quantities_by_unit(id(&m, "s")).unwrap();
        assert_eq!(names(&found), vec!["period", "time"]);
        assert_eq!(m.find_quantity_by_unit(id(&m, "s")).unwrap().unwrap().name(), "time");
        assert_eq!(m.find_quantity_by_unit(id(&m, "h")).unwrap().unwrap().name(), "time");
    }

    #[test]
    fn test_quantity_by_unit_single_and_first() {
        let m = fixture();
        assert_eq!(m.find_quantity_by_unit(id(&m, "km")).unwrap().unwrap().name(), "length");
        // Two matches without "time": registry order decides
        assert_eq!(
            m.find_quantity_by_unit(id(&m, "%")).unwrap().unwrap().name(),
            "volume per volume"
        );
    }

    #[test]
    fn test_quantity_by_unit_none_for_unassigned() {
        let mut m = fixture();
        let stray = m.register_unit(linear("stray", "stray", "1", "1"));
        assert_eq!(m.find_quantity_by_unit(stray).unwrap(), None);
        assert!(m.find_quantities_by_unit(stray).unwrap().is_empty());
        assert!(m.find_unit("stray").is_none());
    }

    #[test]
    fn test_euclid_marker_appends_dimensionless() {
        let m = fixture();
        let found = m.find_quantities_by_unit(id(&m, "%")).unwrap();
        assert_eq!(names(&found), vec!["volume per volume", "dimensionless"]);
        assert!(m.can_convert(id(&m, "%"), id(&m, "unitless")).unwrap());
    }

    #[test]
    fn test_euclid_marker_may_duplicate_dimensionless() {
        let m = fixture();
        let found = m.find_quantities_by_unit(id(&m, "Euc")).unwrap();
        assert_eq!(names(&found), vec!["dimensionless", "volume per volume", "dimensionless"]);
    }

    #[test]
    fn test_add_quantity_duplicate() {
        let mut m = fixture();
        let err = m.add_quantity(Quantity::new("length")).unwrap_err();
        assert_eq!(err, UnitError::DuplicateQuantity("length".to_string()));
    }

    #[test]
    fn test_add_quantity_invalid() {
        let mut m = fixture();
        assert!(matches!(m.add_quantity(Quantity::new("  ")), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(
            m.add_quantity(quantity("mass", &[FOREIGN])),
            Err(UnitError::InvalidArgument(_))
        ));
        assert!(m.find_quantity("mass").is_none());
    }

    #[test]
    fn test_find_or_create_quantity() {
        let mut m = fixture();
        assert_eq!(m.find_or_create_quantity("length").unwrap().len(), 6);

        let created = m.find_or_create_quantity("mass").unwrap();
        assert!(created.is_empty());
        assert_eq!(m.quantities().len(), 11);

        let mass = m.find_quantity("mass").unwrap();
        assert_eq!(m.base_unit(mass).unwrap_err(), UnitError::EmptyQuantity("mass".to_string()));

        let kg = m.register_unit(linear("kilogram", "kg", "1", "1"));
        m.find_or_create_quantity("mass").unwrap().add_unit(kg, true);
        assert_eq!(m.find_unit("kg").unwrap().id(), kg);
        assert!(matches!(m.find_or_create_quantity(""), Err(UnitError::InvalidArgument(_))));
    }

    #[test]
    fn test_add_unit_alias_rejects_blank() {
        let mut m = fixture();
        assert!(matches!(m.add_unit_alias("", "m"), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.add_unit_alias("metres", " "), Err(UnitError::InvalidArgument(_))));
    }

    // ========== Convertible units ==========

    #[test]
    fn test_convertible_units_across_quantities() {
        let m = fixture();
        let convertible = m.find_convertible_units(id(&m, "s")).unwrap();
        assert_eq!(symbols(&convertible), vec!["ms", "min", "h", "d"]);
    }

    #[test]
    fn test_convertible_units_structural_dedup() {
        let mut m = UnitManager::new();
        let metre = m.register_unit(linear("metre", "m", "1", "1"));
        let metre_copy = m.register_unit(linear("metre", "m", "1", "1"));
        let ft = m.register_unit(linear("foot", "ft", "0.3048", "1"));
        let ft_copy = m.register_unit(linear("foot", "ft", "0.3048", "1"));
        m.add_quantity(quantity("length", &[metre, ft])).unwrap();
        m.add_quantity(quantity("distance", &[metre_copy, ft_copy])).unwrap();
        m.add_quantity(quantity("depth", &[metre, ft_copy])).unwrap();

        let convertible = m.find_convertible_units(metre).unwrap();
        assert_eq!(convertible.len(), 1);
        assert_eq!(convertible[0].id(), ft);
    }

    // ========== Conversion ==========

    #[test]
    fn test_convert_temperature() {
        let m = fixture();
        assert_eq!(m.convert_symbols("degF", "degC", &n("212")).unwrap(), n("100"));
        assert_eq!(m.convert_symbols("degC", "degF", &n("-40")).unwrap(), n("-40"));
        assert_eq!(m.convert_symbols("degR", "K", &n("491.67")).unwrap(), n("273.15"));
        assert_eq!(m.convert_symbols("K", "degC", &Number::zero()).unwrap(), n("-273.15"));
    }

    #[test]
    fn test_convert_reciprocal() {
        let m = fixture();
        assert_eq!(m.convert_symbols("s/cycle", "Hz", &n("0.02")).unwrap(), n("50"));
        assert_eq!(m.convert_symbols("kHz", "s/cycle", &n("2")).unwrap(), n("0.0005"));
        assert_eq!(m.convert_symbols("rpm", "Hz", &n("120")).unwrap(), n("2"));
    }

    #[test]
    fn test_convert_division_by_zero() {
        let m = fixture();
        let err = m.convert_symbols("Hz", "s/cycle", &Number::zero()).unwrap_err();
        assert!(matches!(err, UnitError::DivisionByZero { ref symbol, .. } if symbol == "s/cycle"));
        assert!(m.convert_by_symbol("Hz", "s/cycle", &Number::zero()).is_err());
    }

    #[test]
    fn test_convert_is_pure_composition() {
        let m = fixture();
        // Unrelated quantities still produce a number
        let result = m.convert_symbols("km", "h", &n("3.6")).unwrap();
        assert_eq!(result, n("1"));
        assert!(!m.can_convert_by_symbol("km", "h"));
    }

    #[test]
    fn test_convert_symbols_strict() {
        let m = fixture();
        assert!(matches!(
            m.convert_symbols("furlong", "m", &n("1")),
            Err(UnitError::InvalidArgument(_))
        ));
        assert!(matches!(
            m.convert_symbols("m", "furlong", &n("1")),
            Err(UnitError::InvalidArgument(_))
        ));
    }

    // ========== Typed misuse ==========

    #[test]
    fn test_foreign_ids_are_rejected() {
        let m = fixture();
        let m_id = id(&m, "m");
        assert!(matches!(m.find_convertible_units(FOREIGN), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.find_quantities_by_unit(FOREIGN), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.find_quantity_by_unit(FOREIGN), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.can_convert(m_id, FOREIGN), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.can_convert(FOREIGN, m_id), Err(UnitError::InvalidArgument(_))));
        assert!(matches!(m.convert(FOREIGN, m_id, &n("1")), Err(UnitError::InvalidArgument(_))));
        assert!(m.unit(FOREIGN).is_none());
    }

    // ========== Lenient symbol queries ==========

    #[test]
    fn test_symbol_queries_degrade() {
        let m = fixture();
        assert!(m.find_convertible_units_by_symbol("furlong").is_empty());
        assert!(m.find_quantities_by_symbol("furlong").is_empty());
        assert!(m.find_quantity_by_symbol("furlong").is_none());
        assert!(!m.can_convert_by_symbol("furlong", "m"));
        assert!(!m.can_convert_by_symbol("m", "furlong"));
        assert_eq!(m.convert_by_symbol("furlong", "m", &n("7")).unwrap(), n("7"));
        assert_eq!(m.convert_by_symbol("m", "furlong", &n("7")).unwrap(), n("7"));
    }

    #[test]
    fn test_symbol_queries_resolve() {
        let m = fixture();
        assert_eq!(
            symbols(&m.find_convertible_units_by_symbol("mph")),
            vec!["m/s", "km/h", "ft/s"]
        );
        assert_eq!(names(&m.find_quantities_by_symbol("ohm.cm")), vec!["electrical resistivity"]);
        assert_eq!(m.find_quantity_by_symbol("sec").unwrap().name(), "time");
        assert!(m.can_convert_by_symbol("ft", "mi"));
        assert_eq!(m.convert_by_symbol("mi", "ft", &n("1")).unwrap(), n("5280"));
    }

    #[test]
    fn test_display_symbol() {
        let m = fixture();
        assert_eq!(m.display_symbol("ohm.m"), "Ω·m");
        assert_eq!(m.display_symbol("km"), "km");
        assert_eq!(m.display_symbol("furlong"), "");
    }

    // ========== Registry ==========

    #[test]
    fn test_units_are_unique_members() {
        let m = fixture();
        let units = m.units();
        assert_eq!(units.len(), 32);
        assert_eq!(units[0].symbol(), "m");
    }

    #[test]
    fn test_unit_mut_override() {
        let mut m = fixture();
        let ft = id(&m, "ft");
        m.unit_mut(ft).unwrap().set_a(n("0.3048006096"));
        assert_eq!(m.convert_symbols("ft", "m", &n("1")).unwrap(), n("0.3048006096"));
    }

    #[test]
    fn test_display_summary() {
        let m = fixture();
        assert_eq!(
            m.to_string(),
            "Quantities....: 10\nUnits.........: 35\nUnit aliases..: 6"
        );
    }

    #[test]
    fn test_with_aliases() {
        let mut aliases = AliasTable::new();
        aliases.insert("metres", "m").unwrap();
        let mut m = UnitManager::new().with_aliases(aliases);
        let metre = m.register_unit(linear("metre", "m", "1", "1"));
        m.add_quantity(quantity("length", &[metre])).unwrap();
        assert_eq!(m.find_unit("METRES").unwrap().id(), metre);
    }

    #[test]
    fn test_manager_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UnitManager>();
    }
}
