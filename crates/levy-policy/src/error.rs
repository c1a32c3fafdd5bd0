//! # Policy Errors
//!
//! Structured error types for registry writes and resolution, built with
//! `thiserror`. Uniqueness and scope invariants are rejected at write time,
//! so resolution should never observe invalid stored state; when it does,
//! [`PolicyError::InvariantViolation`] fails loudly instead of silently
//! picking a row.

use levy_core::{CountryId, OverrideId, StoreId, ValidationError};
use levy_catalog::CatalogError;
use thiserror::Error;

use crate::rule::TaxScope;

/// Errors from policy registry operations and resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A field failed domain validation (rate range, method value, label).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A federal-scope rule carried a calculation method. Federal rules do
    /// not combine with themselves, so the method is meaningless there.
    #[error("a federal-scope rule must not carry a calculation method")]
    FederalMethodForbidden,

    /// An override already exists for the `(store, country, scope)` key.
    #[error("an override already exists for store {store_id}, country {country_id} at {scope} scope")]
    DuplicateOverride {
        /// The tenant.
        store_id: StoreId,
        /// The country.
        country_id: CountryId,
        /// The conflicting scope.
        scope: TaxScope,
    },

    /// The override id does not resolve.
    #[error("override {0} not found")]
    OverrideNotFound(OverrideId),

    /// A jurisdiction reference did not resolve in the catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Stored policy data violates an invariant that writes are supposed
    /// to enforce. Indicates corrupted policy data requiring operator
    /// intervention; never retried automatically.
    #[error("stored policy data violates an invariant: {0}")]
    InvariantViolation(String),
}
