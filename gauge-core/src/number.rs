//! Exact rational numbers using dashu
//!
//! Uses dashu-ratio (RBig) so that chained unit conversions never
//! accumulate rounding error. Every coefficient read from a definition
//! file is a terminating decimal, which RBig represents exactly.

use std::fmt;
use std::hash::{Hash, Hasher};

use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Overflow: result too large")]
    Overflow,
}

/// Largest decimal exponent accepted when parsing scientific notation
const MAX_EXPONENT: u32 = 4096;

/// Decimal places used by `Display` for non-terminating fractions
const DISPLAY_PLACES: u32 = 20;

/// Exact rational number
///
/// Built on dashu-ratio's RBig, always kept in lowest terms.
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Number {
    inner: RBig,
}

impl Number {
    // ========== Construction ==========

    /// Create from string representation
    /// Supports: "123", "3.14", "1/3", "1.5e10", "-42", "602214076e15"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        // Handle rational format "a/b"
        if let Some((num_str, den_str)) = s.split_once('/') {
            let num = parse_decimal(num_str.trim(), s)?;
            let den = parse_decimal(den_str.trim(), s)?;
            if den.is_zero() {
                return Err(NumberError::DivisionByZero);
            }
            return Ok(Self { inner: num / den });
        }

        Ok(Self { inner: parse_decimal(s, s)? })
    }

    /// Create from i64
    pub fn from_i64(n: i64) -> Self {
        Self { inner: RBig::from(IBig::from(n)) }
    }

    /// Create from f64 using its shortest decimal representation,
    /// so `55.0` becomes exactly 55 and `0.1` exactly 1/10.
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::DomainError(format!("non-finite value {}", f)));
        }
        Self::from_str(&f.to_string())
    }

    pub fn zero() -> Self {
        Self { inner: RBig::ZERO }
    }

    pub fn one() -> Self {
        Self { inner: RBig::ONE }
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    // ========== Conversion ==========

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> f64 {
        self.inner.to_f64().value()
    }

    /// Number of decimal places needed to print this value exactly,
    /// or None if the decimal expansion does not terminate.
    pub fn terminating_places(&self) -> Option<u32> {
        let two = UBig::from(2u8);
        let five = UBig::from(5u8);
        let mut den = self.inner.denominator().clone();

        let mut twos = 0u32;
        while &den % &two == UBig::ZERO {
            den = &den / &two;
            twos += 1;
        }
        let mut fives = 0u32;
        while &den % &five == UBig::ZERO {
            den = &den / &five;
            fives += 1;
        }

        (den == UBig::ONE).then_some(twos.max(fives))
    }

    // ========== Display ==========

    /// Render as decimal string with specified decimal places,
    /// rounding half away from zero
    pub fn as_decimal(&self, places: u32) -> String {
        let scale = IBig::from(UBig::from(10u8).pow(places as usize));
        let scaled = self.inner.numerator() * &scale;
        let den = IBig::from(self.inner.denominator().clone());

        let mut quotient = &scaled / &den;
        let remainder = &scaled % &den;
        let twice = &remainder * IBig::from(2u8);
        let twice_abs = if twice < IBig::ZERO { -twice } else { twice };
        if twice_abs >= den {
            if scaled < IBig::ZERO {
                quotient -= IBig::ONE;
            } else {
                quotient += IBig::ONE;
            }
        }

        let negative = quotient < IBig::ZERO;
        let magnitude = if negative { -quotient } else { quotient };
        let mut digits = magnitude.to_string();
        let sign = if negative { "-" } else { "" };

        if places == 0 {
            return format!("{}{}", sign, digits);
        }

        let places = places as usize;
        if digits.len() <= places {
            digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - places);
        format!("{}{}.{}", sign, int_part, frac_part)
    }

    /// Lossless text form: a decimal when it terminates, "num/den" otherwise.
    /// Always accepted back by `from_str`.
    pub fn to_exact_string(&self) -> String {
        match self.terminating_places() {
            Some(places) => self.as_decimal(places),
            None => format!("{}/{}", self.inner.numerator(), self.inner.denominator()),
        }
    }
}

/// Parse an optionally signed decimal with optional exponent, exactly.
/// `whole` is the full input, used for error messages.
fn parse_decimal(s: &str, whole: &str) -> Result<RBig, NumberError> {
    let parse_error = || NumberError::ParseError(whole.to_string());

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => {
            let exp: i64 = s[pos + 1..].parse().map_err(|_| parse_error())?;
            (&s[..pos], exp)
        }
        None => (s, 0),
    };

    let (negative, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        Some(_) => (false, mantissa),
        None => return Err(parse_error()),
    };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(parse_error());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(parse_error());
    }
    if exponent.unsigned_abs() > u64::from(MAX_EXPONENT) {
        return Err(NumberError::Overflow);
    }

    let mut numerator: IBig = format!("{}{}", int_part, frac_part)
        .parse()
        .map_err(|_| parse_error())?;
    if negative {
        numerator = -numerator;
    }

    // value = numerator * 10^(exponent - frac_len)
    let shift = exponent - frac_part.len() as i64;
    let ten = UBig::from(10u8);
    let rational = if shift >= 0 {
        RBig::from(numerator * IBig::from(ten.pow(shift as usize)))
    } else {
        RBig::from_parts(numerator, ten.pow(shift.unsigned_abs() as usize))
    };
    Ok(rational)
}

// ========== Trait Implementations ==========

impl std::str::FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::from_str(s)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // RBig is always reduced, so equal values hash equally
        self.inner.numerator().hash(state);
        self.inner.denominator().hash(state);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terminating_places() {
            Some(places) => write!(f, "{}", self.as_decimal(places)),
            None => {
                let s = self.as_decimal(DISPLAY_PLACES);
                write!(f, "{}", s.trim_end_matches('0').trim_end_matches('.'))
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_exact_string())
    }
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number::from_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        Ok(Number { inner: RBig::from(IBig::from(v)) })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        Number::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        Number::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}
