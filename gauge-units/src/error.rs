//! Registry and conversion errors

use gauge_core::Number;
use thiserror::Error;

/// Errors raised by the strict (typed) registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// A required argument was blank or a unit handle is foreign to the registry
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("quantity is already present: {0}")]
    DuplicateQuantity(String),

    /// Base unit requested before any unit was added
    #[error("quantity has no units: {0}")]
    EmptyQuantity(String),

    /// The bilinear transform of `symbol` has a zero denominator at `value`
    #[error("division by zero converting {value} with unit '{symbol}'")]
    DivisionByZero { symbol: String, value: Number },
}

impl UnitError {
    pub(crate) fn invalid(details: impl Into<String>) -> Self {
        UnitError::InvalidArgument(details.into())
    }
}
