//! Gauge Core - Fundamental types
//!
//! This crate provides the core types used throughout Gauge:
//! - `Number`: Exact rational numbers
//! - `Diagnostic`: Structured, non-fatal problem reports

mod number;
mod error;

pub use number::{Number, NumberError};
pub use error::{Diagnostic, DiagnosticContext, Severity, codes};
