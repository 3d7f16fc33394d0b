//! Gauge Units - Units-of-measure registry and conversion
//!
//! Units convert to the base unit of their quantity through one bilinear
//! formula, `(a*x + b) / (c*x + d)`, which covers proportional, affine
//! (temperature scales) and reciprocal (period against frequency) units.
//!
//! - [`Unit`]: symbol, display symbol and the four coefficients
//! - [`Quantity`]: ordered unit ids, the first being the base unit
//! - [`AliasTable`]: case-insensitive alternate spellings
//! - [`UnitManager`]: the registry all lookups and conversions go through

mod alias;
mod error;
mod manager;
mod quantity;
mod unit;

pub use alias::AliasTable;
pub use error::UnitError;
pub use manager::{
    UnitId, UnitManager, UnitRef, DIMENSIONLESS_QUANTITY, EUCLID_SYMBOL, TIME_QUANTITY,
    UNITLESS_SYMBOL,
};
pub use quantity::Quantity;
pub use unit::Unit;
