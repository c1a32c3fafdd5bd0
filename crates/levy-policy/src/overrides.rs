//! # Tenant Override Registry
//!
//! Per-tenant customizations of the platform baseline, keyed by
//! `(store_id, country_id, state_id)`.
//!
//! Create is deliberately *not* an upsert: a second create for an occupied
//! key fails with a conflict and never mutates the existing row, so a
//! tenant cannot clobber an existing customization without an explicit
//! update call. The check and the insert run under a single write lock;
//! concurrent creates for one key produce exactly one success and one
//! conflict.

use std::collections::HashMap;

use chrono::Utc;
use levy_core::{CalculationMethod, CountryId, OverrideId, RatePercent, StateId, StoreId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::rule::{validate_label, validate_scope_method, TenantTaxOverride};

/// Input for creating an override. The row id and timestamps are assigned
/// by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOverride {
    /// The owning tenant.
    pub store_id: StoreId,
    /// The country the override applies to.
    pub country_id: CountryId,
    /// The state the override applies to; `None` overrides the federal rule.
    pub state_id: Option<StateId>,
    /// Display label.
    pub tax_label: String,
    /// The rate, 0-100.
    pub tax_rate: RatePercent,
    /// Combination method; must be `None` at federal scope.
    pub calculation_method: Option<CalculationMethod>,
}

/// Partial update for an override. `None` fields are left unchanged;
/// `calculation_method` distinguishes "leave unchanged" (`None`) from
/// "clear to null" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverridePatch {
    /// Replacement label.
    pub tax_label: Option<String>,
    /// Replacement rate.
    pub tax_rate: Option<RatePercent>,
    /// Replacement method (outer `Some`), including `Some(None)` to clear.
    pub calculation_method: Option<Option<CalculationMethod>>,
}

type OverrideKey = (StoreId, CountryId, Option<StateId>);

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<OverrideId, TenantTaxOverride>,
    by_key: HashMap<OverrideKey, OverrideId>,
}

/// Thread-safe registry of tenant tax overrides.
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    inner: RwLock<Inner>,
}

impl OverrideRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an override.
    ///
    /// # Errors
    ///
    /// [`PolicyError::DuplicateOverride`] when the
    /// `(store, country, state)` key already has an override — the existing
    /// row is never touched. [`PolicyError::Validation`] /
    /// [`PolicyError::FederalMethodForbidden`] for invalid fields.
    pub fn create(&self, new: NewOverride) -> Result<TenantTaxOverride, PolicyError> {
        validate_label(&new.tax_label)?;
        validate_scope_method(new.state_id, new.calculation_method)?;

        let now = Utc::now();
        let row = TenantTaxOverride {
            id: OverrideId::new(),
            store_id: new.store_id,
            country_id: new.country_id,
            state_id: new.state_id,
            tax_label: new.tax_label,
            tax_rate: new.tax_rate,
            calculation_method: new.calculation_method,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write();
        let key = (row.store_id, row.country_id, row.state_id);
        if inner.by_key.contains_key(&key) {
            return Err(PolicyError::DuplicateOverride {
                store_id: row.store_id,
                country_id: row.country_id,
                scope: row.scope(),
            });
        }
        inner.by_key.insert(key, row.id);
        inner.by_id.insert(row.id, row.clone());
        Ok(row)
    }

    /// Re-insert an override loaded from storage, keeping its id and
    /// timestamps. Used by database hydration at startup.
    ///
    /// # Errors
    ///
    /// Same as [`OverrideRegistry::create`].
    pub fn insert_existing(&self, row: TenantTaxOverride) -> Result<(), PolicyError> {
        row.validate()?;
        let mut inner = self.inner.write();
        let key = (row.store_id, row.country_id, row.state_id);
        if let Some(existing) = inner.by_key.get(&key) {
            if *existing != row.id {
                return Err(PolicyError::DuplicateOverride {
                    store_id: row.store_id,
                    country_id: row.country_id,
                    scope: row.scope(),
                });
            }
        }
        inner.by_key.insert(key, row.id);
        inner.by_id.insert(row.id, row);
        Ok(())
    }

    /// Apply a partial update to an override.
    ///
    /// The patched row is validated as a whole before anything is stored,
    /// so a patch that would (for example) put a calculation method on a
    /// federal override is rejected atomically.
    ///
    /// # Errors
    ///
    /// [`PolicyError::OverrideNotFound`] when the id does not resolve, plus
    /// the validation errors of [`OverrideRegistry::create`].
    pub fn update(
        &self,
        id: OverrideId,
        patch: OverridePatch,
    ) -> Result<TenantTaxOverride, PolicyError> {
        let mut inner = self.inner.write();
        let row = inner
            .by_id
            .get_mut(&id)
            .ok_or(PolicyError::OverrideNotFound(id))?;

        let mut candidate = row.clone();
        if let Some(label) = patch.tax_label {
            candidate.tax_label = label;
        }
        if let Some(rate) = patch.tax_rate {
            candidate.tax_rate = rate;
        }
        if let Some(method) = patch.calculation_method {
            candidate.calculation_method = method;
        }
        candidate.validate()?;
        candidate.updated_at = Utc::now();

        *row = candidate.clone();
        Ok(candidate)
    }

    /// Delete an override, returning the removed row.
    ///
    /// # Errors
    ///
    /// [`PolicyError::OverrideNotFound`] when the id does not resolve.
    pub fn delete(&self, id: OverrideId) -> Result<TenantTaxOverride, PolicyError> {
        let mut inner = self.inner.write();
        let row = inner
            .by_id
            .remove(&id)
            .ok_or(PolicyError::OverrideNotFound(id))?;
        inner
            .by_key
            .remove(&(row.store_id, row.country_id, row.state_id));
        Ok(row)
    }

    /// Delete every override a tenant holds for a country, at both scopes.
    /// Returns the number of rows removed. Used to reset a tenant to
    /// platform defaults.
    pub fn delete_all(&self, store_id: StoreId, country_id: CountryId) -> usize {
        let mut inner = self.inner.write();
        let ids: Vec<OverrideId> = inner
            .by_id
            .values()
            .filter(|row| row.store_id == store_id && row.country_id == country_id)
            .map(|row| row.id)
            .collect();
        for id in &ids {
            if let Some(row) = inner.by_id.remove(id) {
                inner
                    .by_key
                    .remove(&(row.store_id, row.country_id, row.state_id));
            }
        }
        ids.len()
    }

    /// Fetch an override by id.
    pub fn get(&self, id: OverrideId) -> Option<TenantTaxOverride> {
        self.inner.read().by_id.get(&id).cloned()
    }

    /// Fetch the override at an exact `(store, country, state)` key.
    pub fn find(
        &self,
        store_id: StoreId,
        country_id: CountryId,
        state_id: Option<StateId>,
    ) -> Option<TenantTaxOverride> {
        let inner = self.inner.read();
        let id = inner.by_key.get(&(store_id, country_id, state_id))?;
        inner.by_id.get(id).cloned()
    }

    /// List a tenant's overrides for a country, federal scope first, then
    /// state scopes by creation time. `state_filter` narrows to one state.
    pub fn list(
        &self,
        store_id: StoreId,
        country_id: CountryId,
        state_filter: Option<StateId>,
    ) -> Vec<TenantTaxOverride> {
        let inner = self.inner.read();
        let mut rows: Vec<TenantTaxOverride> = inner
            .by_id
            .values()
            .filter(|row| {
                row.store_id == store_id
                    && row.country_id == country_id
                    && state_filter.map_or(true, |wanted| row.state_id == Some(wanted))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let a_key = (a.state_id.is_some(), a.created_at, a.id);
            let b_key = (b.state_id.is_some(), b.created_at, b.id);
            a_key.cmp(&b_key)
        });
        rows
    }

    /// Total number of overrides across all tenants.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the registry holds no overrides.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
