//! Unit representation with bilinear conversion coefficients

use std::fmt;
use std::hash::{Hash, Hasher};

use gauge_core::{Number, NumberError};
use serde::{Deserialize, Serialize};

use crate::UnitError;

/// A measurement unit with its transform to the base unit of its quantity.
///
/// `to_base(x) = (a*x + b) / (c*x + d)`
///
/// This single form covers proportional units (`b = c = 0`), affine units
/// such as degrees Celsius (`c = 0`, `b != 0`), and reciprocal units such as
/// a period expressed against a frequency base (`a = d = 0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    name: String,
    symbol: String,
    display_symbol: String,
    a: Number,
    b: Number,
    c: Number,
    d: Number,
}

impl Unit {
    /// Create a unit from all four coefficients. The display symbol
    /// defaults to `symbol`.
    pub fn new(name: &str, symbol: &str, a: Number, b: Number, c: Number, d: Number) -> Self {
        Unit {
            name: name.to_string(),
            symbol: symbol.to_string(),
            display_symbol: symbol.to_string(),
            a,
            b,
            c,
            d,
        }
    }

    /// Create a proportional unit: `base = value * factor`
    pub fn proportional(name: &str, symbol: &str, factor: Number) -> Self {
        Self::new(name, symbol, factor, Number::zero(), Number::zero(), Number::one())
    }

    /// Create an affine unit: `base = value * factor + offset`
    pub fn with_offset(name: &str, symbol: &str, factor: Number, offset: Number) -> Self {
        Self::new(name, symbol, factor, offset, Number::zero(), Number::one())
    }

    /// Builder: set the presentation symbol
    pub fn with_display_symbol(mut self, display_symbol: &str) -> Self {
        self.display_symbol = display_symbol.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn display_symbol(&self) -> &str {
        &self.display_symbol
    }

    pub fn a(&self) -> &Number {
        &self.a
    }

    pub fn b(&self) -> &Number {
        &self.b
    }

    pub fn c(&self) -> &Number {
        &self.c
    }

    pub fn d(&self) -> &Number {
        &self.d
    }

    // Administrative overrides. Not part of the conversion flow.

    pub fn set_a(&mut self, a: Number) {
        self.a = a;
    }

    pub fn set_b(&mut self, b: Number) {
        self.b = b;
    }

    pub fn set_c(&mut self, c: Number) {
        self.c = c;
    }

    pub fn set_d(&mut self, d: Number) {
        self.d = d;
    }

    pub fn set_display_symbol(&mut self, display_symbol: &str) {
        self.display_symbol = display_symbol.to_string();
    }

    /// True when `from_base` is the exact inverse of `to_base` (`a*d - b*c != 0`)
    pub fn is_invertible(&self) -> bool {
        !self.a.mul(&self.d).sub(&self.b.mul(&self.c)).is_zero()
    }

    /// True when this unit maps every value onto itself
    pub fn is_base_identity(&self) -> bool {
        !self.a.is_zero() && self.a == self.d && self.b.is_zero() && self.c.is_zero()
    }

    /// Convert a value in this unit to the base unit of its quantity
    pub fn to_base(&self, value: &Number) -> Result<Number, UnitError> {
        // (a*x + b) / (c*x + d)
        let numerator = self.a.mul(value).add(&self.b);
        let denominator = self.c.mul(value).add(&self.d);
        numerator
            .checked_div(&denominator)
            .map_err(|e| self.numeric_error(e, value))
    }

    /// Convert a value in the base unit to this unit
    pub fn from_base(&self, value: &Number) -> Result<Number, UnitError> {
        // (b - d*y) / (c*y - a)
        let numerator = self.b.sub(&self.d.mul(value));
        let denominator = self.c.mul(value).sub(&self.a);
        numerator
            .checked_div(&denominator)
            .map_err(|e| self.numeric_error(e, value))
    }

    fn numeric_error(&self, err: NumberError, value: &Number) -> UnitError {
        match err {
            NumberError::DivisionByZero => UnitError::DivisionByZero {
                symbol: self.symbol.clone(),
                value: value.clone(),
            },
            other => UnitError::invalid(other.to_string()),
        }
    }
}

/// Display symbol is presentation only and takes no part in identity
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.symbol == other.symbol
            && self.a == other.a
            && self.b == other.b
            && self.c == other.c
            && self.d == other.d
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.symbol.hash(state);
        self.a.hash(state);
        self.b.hash(state);
        self.c.hash(state);
        self.d.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] a={} b={} c={} d={}",
            self.name, self.symbol, self.a, self.b, self.c, self.d
        )
    }
}
