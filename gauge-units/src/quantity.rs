//! Quantity type - a named, ordered family of units

use serde::{Deserialize, Serialize};

use crate::{UnitError, UnitId};

/// A physical quantity such as "length" or "velocity".
///
/// Members are referenced by [`UnitId`] into the owning registry's unit
/// arena. The first member is the base unit every other member converts
/// through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    units: Vec<UnitId>,
}

impl Quantity {
    /// Create an empty quantity
    pub fn new(name: &str) -> Self {
        Quantity {
            name: name.to_string(),
            description: None,
            units: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Add a member unit; at the front when it is the base unit.
    /// No de-duplication is performed.
    pub fn add_unit(&mut self, unit: UnitId, is_base: bool) {
        if is_base {
            self.units.insert(0, unit);
        } else {
            self.units.push(unit);
        }
    }

    pub fn base_unit(&self) -> Result<UnitId, UnitError> {
        self.units
            .first()
            .copied()
            .ok_or_else(|| UnitError::EmptyQuantity(self.name.clone()))
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
