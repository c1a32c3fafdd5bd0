//! # Calculation Methods
//!
//! How a state-level tax rate combines with the federal rate for the same
//! country. The method is a property of the *state-scope* rule; federal
//! rules never carry one (they have nothing to combine with themselves),
//! and the registries reject writes that violate this.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How a state-level rate composes with the federal rate.
///
/// A state rule with no method is treated as [`CalculationMethod::Added`]
/// at combination time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// State tax is levied in addition to federal, on the same base amount.
    Added,
    /// State tax fully supersedes federal for this jurisdiction.
    Instead,
    /// State tax is computed on the federal-inclusive amount (tax on tax).
    Compounded,
}

impl CalculationMethod {
    /// Return the string representation of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Instead => "instead",
            Self::Compounded => "compounded",
        }
    }

    /// Return all method variants.
    pub fn all() -> &'static [CalculationMethod] {
        &[Self::Added, Self::Instead, Self::Compounded]
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CalculationMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Self::Added),
            "instead" => Ok(Self::Instead),
            "compounded" => Ok(Self::Compounded),
            other => Err(ValidationError::InvalidCalculationMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(CalculationMethod::Added.to_string(), "added");
        assert_eq!(CalculationMethod::Instead.to_string(), "instead");
        assert_eq!(CalculationMethod::Compounded.to_string(), "compounded");
    }

    #[test]
    fn method_count() {
        assert_eq!(CalculationMethod::all().len(), 3);
    }

    #[test]
    fn method_serde_roundtrip() {
        for m in CalculationMethod::all() {
            let json = serde_json::to_string(m).unwrap();
            let parsed: CalculationMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(*m, parsed);
        }
    }

    #[test]
    fn method_from_str() {
        assert_eq!(
            "compounded".parse::<CalculationMethod>().unwrap(),
            CalculationMethod::Compounded
        );
        assert!(matches!(
            "stacked".parse::<CalculationMethod>(),
            Err(ValidationError::InvalidCalculationMethod(_))
        ));
    }

    #[test]
    fn method_serde_matches_as_str() {
        for m in CalculationMethod::all() {
            let json = serde_json::to_string(m).unwrap();
            assert_eq!(json, format!("\"{}\"", m.as_str()));
        }
    }
}
