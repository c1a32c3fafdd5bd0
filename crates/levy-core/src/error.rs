//! # Validation Errors
//!
//! Structured error types for domain primitive validation, built with
//! `thiserror`. Each variant carries the rejected input and the expected
//! format so that operators can diagnose misconfiguration without guesswork.
//!
//! Validation never coerces: an out-of-range rate is rejected, not clamped;
//! a rate with too many decimal places is rejected, not truncated.

use thiserror::Error;

/// Validation errors for domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rate string could not be parsed as a fixed-point percentage.
    #[error("invalid tax rate: \"{value}\" ({reason})")]
    InvalidRate {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Rate parsed but falls outside the permitted [0, 100] range.
    #[error("tax rate out of range: {0} (expected 0 to 100)")]
    RateOutOfRange(String),

    /// Calculation method string is not one of the known values.
    #[error("invalid calculation method: \"{0}\" (expected added, instead, or compounded)")]
    InvalidCalculationMethod(String),

    /// Tax label is empty or exceeds the display limit.
    #[error("invalid tax label: must be non-empty and at most 120 characters")]
    InvalidTaxLabel,

    /// Country ISO code does not match the expected shape.
    #[error("invalid country code: \"{value}\" (expected {expected})")]
    InvalidCountryCode {
        /// The string that failed validation.
        value: String,
        /// Description of the expected format.
        expected: &'static str,
    },

    /// State/province code is empty or too long.
    #[error("invalid state code: \"{0}\" (expected 1-10 characters)")]
    InvalidStateCode(String),
}
