//! # Tax Rule Records
//!
//! The two persisted policy shapes — platform defaults and tenant
//! overrides — plus the scope key both registries share.
//!
//! There is deliberately a *single* override shape: a country-only
//! customization is the `state_id = None` row, not a separate entity. This
//! keeps "which record wins" unambiguous at every scope.

use chrono::{DateTime, Utc};
use levy_core::{CalculationMethod, CountryId, OverrideId, RatePercent, StateId, StoreId, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Maximum accepted tax label length.
pub const MAX_LABEL_LEN: usize = 120;

/// The scope of a tax rule: country-wide (federal) or one sub-national
/// jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxScope {
    /// Applies uniformly across the country (`state_id = None`).
    Federal,
    /// Applies to one state/province.
    State(StateId),
}

impl TaxScope {
    /// Build a scope from an optional state id.
    pub fn from_state_id(state_id: Option<StateId>) -> Self {
        match state_id {
            Some(id) => Self::State(id),
            None => Self::Federal,
        }
    }

    /// The state id, when state-scoped.
    pub fn state_id(&self) -> Option<StateId> {
        match self {
            Self::Federal => None,
            Self::State(id) => Some(*id),
        }
    }

    /// Whether this is the federal scope.
    pub fn is_federal(&self) -> bool {
        matches!(self, Self::Federal)
    }
}

impl std::fmt::Display for TaxScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Federal => f.write_str("federal"),
            Self::State(id) => write!(f, "state {id}"),
        }
    }
}

/// A platform-wide baseline tax rule.
///
/// One row per `(country_id, state_id)`; `state_id = None` is the federal
/// rule. Owned by platform operators, never tenant-aware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultTaxRule {
    /// The country this rule applies to.
    pub country_id: CountryId,
    /// The state this rule applies to; `None` = federal scope.
    pub state_id: Option<StateId>,
    /// Display label (e.g. "IGST", "Federal GST").
    pub tax_label: String,
    /// The rate, 0-100 with two decimal places.
    pub tax_rate: RatePercent,
    /// How a state-scope rate combines with the federal rate. Must be
    /// `None` at federal scope; `None` at state scope combines as `added`.
    pub calculation_method: Option<CalculationMethod>,
}

impl DefaultTaxRule {
    /// The scope key of this rule.
    pub fn scope(&self) -> TaxScope {
        TaxScope::from_state_id(self.state_id)
    }

    /// Validate the label and the federal-method invariant.
    ///
    /// # Errors
    ///
    /// [`PolicyError::Validation`] for a bad label,
    /// [`PolicyError::FederalMethodForbidden`] for a federal rule carrying
    /// a calculation method.
    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_label(&self.tax_label)?;
        validate_scope_method(self.state_id, self.calculation_method)
    }
}

/// A tenant-specific tax rule replacing the default at the same scope.
///
/// One row per `(store_id, country_id, state_id)`. An override replaces the
/// *entire* rule — label, rate, and method — it never inherits fields from
/// the default it shadows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantTaxOverride {
    /// Row identifier.
    pub id: OverrideId,
    /// The owning tenant.
    pub store_id: StoreId,
    /// The country this override applies to.
    pub country_id: CountryId,
    /// The state this override applies to; `None` overrides the federal rule.
    pub state_id: Option<StateId>,
    /// Display label.
    pub tax_label: String,
    /// The rate, 0-100 with two decimal places.
    pub tax_rate: RatePercent,
    /// Combination method; same invariants as [`DefaultTaxRule`].
    pub calculation_method: Option<CalculationMethod>,
    /// When the override was created.
    pub created_at: DateTime<Utc>,
    /// When the override was last modified.
    pub updated_at: DateTime<Utc>,
}

impl TenantTaxOverride {
    /// The scope key of this override.
    pub fn scope(&self) -> TaxScope {
        TaxScope::from_state_id(self.state_id)
    }

    /// Validate the label and the federal-method invariant.
    ///
    /// # Errors
    ///
    /// Same as [`DefaultTaxRule::validate`].
    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_label(&self.tax_label)?;
        validate_scope_method(self.state_id, self.calculation_method)
    }
}

/// Validate a tax label: non-empty after trimming, bounded length.
pub(crate) fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(ValidationError::InvalidTaxLabel);
    }
    Ok(())
}

/// Enforce the federal-method invariant: a rule with no state must not
/// carry a calculation method.
pub(crate) fn validate_scope_method(
    state_id: Option<StateId>,
    method: Option<CalculationMethod>,
) -> Result<(), PolicyError> {
    if state_id.is_none() && method.is_some() {
        return Err(PolicyError::FederalMethodForbidden);
    }
    Ok(())
}
