//! # Fixed-Point Rate Arithmetic
//!
//! Tax rates are stored as `i64` hundredths of a percent ("centi-percent"):
//! `9.00%` is `900`, `28.62%` is `2862`. Rates are parsed from and formatted
//! to decimal strings — `f64` never appears in policy math, so resolution
//! and combination are exactly reproducible.
//!
//! Two types share the representation:
//!
//! - [`RatePercent`] — a *stored* policy rate, validated into `[0, 100]`.
//! - [`EffectiveRate`] — the *combined* rate produced by the resolution
//!   engine. Combined rates can legitimately exceed 100 (two stacked 60%
//!   rates), so the stored-rate bound does not apply.
//!
//! ## Parsing
//!
//! Parsing is strict: more than two decimal places, negative values, values
//! above 100, and non-numeric input are rejected with a
//! [`ValidationError`], never truncated or clamped.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hundredths of a percent per whole percentage point.
const CENTI_PER_PERCENT: i64 = 100;

/// Upper bound for stored rates: 100% in centi-percent.
const MAX_STORED_CENTI: i64 = 100 * CENTI_PER_PERCENT;

/// A stored tax rate as a percentage in `[0, 100]`, fixed-point with
/// two decimal places of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RatePercent(i64);

impl RatePercent {
    /// The zero rate.
    pub const ZERO: RatePercent = RatePercent(0);

    /// Create a rate from hundredths of a percent, validating the
    /// `[0, 100]` bound.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RateOutOfRange`] when `centi` is negative
    /// or exceeds 10 000 (100%).
    pub fn from_centi(centi: i64) -> Result<Self, ValidationError> {
        if !(0..=MAX_STORED_CENTI).contains(&centi) {
            return Err(ValidationError::RateOutOfRange(format_centi(centi)));
        }
        Ok(Self(centi))
    }

    /// Parse a rate from a decimal string such as `"9"`, `"4.5"`, or
    /// `"28.62"`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRate`] for non-numeric input or
    /// more than two decimal places, and
    /// [`ValidationError::RateOutOfRange`] for values outside `[0, 100]`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let centi = parse_centi(s)?;
        Self::from_centi(centi).map_err(|_| ValidationError::RateOutOfRange(s.trim().to_string()))
    }

    /// The rate in hundredths of a percent.
    pub const fn as_centi(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RatePercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_centi(self.0))
    }
}

impl TryFrom<String> for RatePercent {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RatePercent> for String {
    fn from(rate: RatePercent) -> Self {
        rate.to_string()
    }
}

/// A combined effective rate in hundredths of a percent.
///
/// Produced by the resolution engine's combination step. Unlike
/// [`RatePercent`] this is not bounded above by 100 — `added` and
/// `compounded` combinations can exceed any single stored rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EffectiveRate(i64);

impl EffectiveRate {
    /// The zero rate: no tax applies.
    pub const ZERO: EffectiveRate = EffectiveRate(0);

    /// Create an effective rate from hundredths of a percent.
    pub const fn from_centi(centi: i64) -> Self {
        Self(centi)
    }

    /// The rate in hundredths of a percent.
    pub const fn as_centi(&self) -> i64 {
        self.0
    }
}

impl From<RatePercent> for EffectiveRate {
    fn from(rate: RatePercent) -> Self {
        Self(rate.as_centi())
    }
}

impl std::fmt::Display for EffectiveRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_centi(self.0))
    }
}

impl TryFrom<String> for EffectiveRate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_centi(&value).map(Self)
    }
}

impl From<EffectiveRate> for String {
    fn from(rate: EffectiveRate) -> Self {
        rate.to_string()
    }
}

/// Parse a decimal percentage string into hundredths of a percent.
///
/// Accepts an optional fractional part of at most two digits. Rejects
/// anything else — signs, exponents, extra decimals, empty input.
fn parse_centi(s: &str) -> Result<i64, ValidationError> {
    let trimmed = s.trim();
    let invalid = |reason: &str| ValidationError::InvalidRate {
        value: trimmed.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty string"));
    }
    if trimmed.starts_with('+') || trimmed.starts_with('-') {
        return Err(invalid("signs are not permitted"));
    }

    let (int_str, frac_str) = match trimmed.split_once('.') {
        Some((_, "")) => return Err(invalid("trailing decimal point")),
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if int_str.is_empty() || !int_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if frac_str.len() > 2 {
        return Err(invalid("at most two decimal places are supported"));
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }

    let integer: i64 = int_str
        .parse()
        .map_err(|_| invalid("integer part overflows"))?;
    let frac: i64 = match frac_str.len() {
        0 => 0,
        1 => frac_str.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
        _ => frac_str.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
    };

    integer
        .checked_mul(CENTI_PER_PERCENT)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| invalid("value overflows"))
}

/// Format hundredths of a percent as a decimal string with two places.
fn format_centi(centi: i64) -> String {
    let sign = if centi < 0 { "-" } else { "" };
    let abs = centi.abs();
    format!("{}{}.{:02}", sign, abs / CENTI_PER_PERCENT, abs % CENTI_PER_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_whole_percent() {
        assert_eq!(RatePercent::parse("9").unwrap().as_centi(), 900);
        assert_eq!(RatePercent::parse("100").unwrap().as_centi(), 10_000);
        assert_eq!(RatePercent::parse("0").unwrap().as_centi(), 0);
    }

    #[test]
    fn parse_decimal_percent() {
        assert_eq!(RatePercent::parse("4.5").unwrap().as_centi(), 450);
        assert_eq!(RatePercent::parse("28.62").unwrap().as_centi(), 2862);
        assert_eq!(RatePercent::parse("9.98").unwrap().as_centi(), 998);
        assert_eq!(RatePercent::parse("0.01").unwrap().as_centi(), 1);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(RatePercent::parse(" 18.00 ").unwrap().as_centi(), 1800);
    }

    #[test]
    fn parse_rejects_out_of_range() {
        assert!(matches!(
            RatePercent::parse("100.01"),
            Err(ValidationError::RateOutOfRange(_))
        ));
        assert!(RatePercent::parse("250").is_err());
    }

    #[test]
    fn parse_rejects_negative() {
        assert!(matches!(
            RatePercent::parse("-5"),
            Err(ValidationError::InvalidRate { .. })
        ));
    }

    #[test]
    fn parse_rejects_excess_precision() {
        // Strict: never truncate a third decimal place.
        assert!(RatePercent::parse("9.975").is_err());
    }

    #[test]
    fn parse_rejects_junk() {
        for bad in ["", " ", "abc", "1.2.3", "1e2", ".", "5.", "+3"] {
            assert!(RatePercent::parse(bad).is_err(), "accepted: {bad:?}");
        }
    }

    #[test]
    fn display_two_decimal_places() {
        assert_eq!(RatePercent::parse("9").unwrap().to_string(), "9.00");
        assert_eq!(RatePercent::parse("28.62").unwrap().to_string(), "28.62");
        assert_eq!(RatePercent::ZERO.to_string(), "0.00");
    }

    #[test]
    fn serde_as_string() {
        let rate = RatePercent::parse("18").unwrap();
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, "\"18.00\"");
        let parsed: RatePercent = serde_json::from_str("\"18.00\"").unwrap();
        assert_eq!(parsed, rate);
    }

    #[test]
    fn serde_rejects_invalid_string() {
        assert!(serde_json::from_str::<RatePercent>("\"101\"").is_err());
        assert!(serde_json::from_str::<RatePercent>("\"x\"").is_err());
    }

    #[test]
    fn effective_rate_unbounded() {
        let rate = EffectiveRate::from_centi(12_000);
        assert_eq!(rate.to_string(), "120.00");
    }

    #[test]
    fn effective_rate_from_stored() {
        let stored = RatePercent::parse("9").unwrap();
        assert_eq!(EffectiveRate::from(stored).as_centi(), 900);
    }

    proptest! {
        #[test]
        fn roundtrip_centi(centi in 0i64..=10_000) {
            let rate = RatePercent::from_centi(centi).unwrap();
            let parsed = RatePercent::parse(&rate.to_string()).unwrap();
            prop_assert_eq!(parsed.as_centi(), centi);
        }

        #[test]
        fn out_of_range_always_rejected(centi in 10_001i64..1_000_000) {
            prop_assert!(RatePercent::from_centi(centi).is_err());
        }
    }
}
