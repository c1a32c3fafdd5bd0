//! # Country & State Records
//!
//! Reference-data records for jurisdictions. Construction validates the
//! ISO code shapes; everything else is carried as-is from the ingestion
//! source.

use levy_core::{CountryId, StateId, ValidationError};
use serde::{Deserialize, Serialize};

/// A country in the jurisdiction catalog.
///
/// Immutable reference data. `currency_code` links the platform's default
/// currency for the country when the ingestion source provides one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Catalog identifier.
    pub id: CountryId,
    /// ISO 3166-1 alpha-2 code (e.g. "IN").
    pub iso2: String,
    /// ISO 3166-1 alpha-3 code (e.g. "IND").
    pub iso3: String,
    /// ISO 3166-1 numeric code.
    pub numeric_code: u16,
    /// Display name.
    pub name: String,
    /// Region metadata (e.g. "Asia"), when known.
    pub region: Option<String>,
    /// ISO 4217 default currency code, when linked.
    pub currency_code: Option<String>,
}

impl Country {
    /// Create a country record, validating the ISO code shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountryCode`] when `iso2` is not
    /// two uppercase ASCII letters or `iso3` is not three.
    pub fn new(
        id: CountryId,
        iso2: impl Into<String>,
        iso3: impl Into<String>,
        numeric_code: u16,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let iso2 = iso2.into();
        let iso3 = iso3.into();
        if iso2.len() != 2 || !iso2.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCountryCode {
                value: iso2,
                expected: "2 uppercase ASCII letters",
            });
        }
        if iso3.len() != 3 || !iso3.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCountryCode {
                value: iso3,
                expected: "3 uppercase ASCII letters",
            });
        }
        Ok(Self {
            id,
            iso2,
            iso3,
            numeric_code,
            name: name.into(),
            region: None,
            currency_code: None,
        })
    }

    /// Builder: set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Builder: link the default currency.
    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }
}

/// A sub-national jurisdiction belonging to exactly one country.
///
/// `country_iso2` is denormalized from the owning country for fast
/// filtering without a catalog join; the catalog keeps it consistent at
/// insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Catalog identifier.
    pub id: StateId,
    /// Owning country.
    pub country_id: CountryId,
    /// Short subdivision code (e.g. "CA", "MH", "ON").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Denormalized owning-country ISO2 code.
    pub country_iso2: String,
    /// Free-form subdivision kind: "state", "province", "territory", ...
    pub kind: String,
}

impl State {
    /// Create a state record, validating the subdivision code.
    ///
    /// `country_iso2` is filled in by the catalog at insert time from the
    /// owning country; constructors pass it through when hydrating from
    /// storage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidStateCode`] when `code` is empty
    /// or longer than 10 characters.
    pub fn new(
        id: StateId,
        country_id: CountryId,
        code: impl Into<String>,
        name: impl Into<String>,
        country_iso2: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.is_empty() || code.len() > 10 {
            return Err(ValidationError::InvalidStateCode(code));
        }
        Ok(Self {
            id,
            country_id,
            code,
            name: name.into(),
            country_iso2: country_iso2.into(),
            kind: kind.into(),
        })
    }
}
