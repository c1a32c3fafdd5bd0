//! # Default Policy Registry
//!
//! The platform-wide fallback layer: baseline tax rules per jurisdiction,
//! keyed by `(country_id, state_id)`. One federal rule and at most one rule
//! per state, per country. Never references tenants.
//!
//! This registry is the *single* source of baseline truth — resolution
//! never branches on country names or any other out-of-band data to
//! synthesize a baseline.

use std::collections::HashMap;

use levy_core::{CountryId, StateId};
use levy_catalog::JurisdictionCatalog;
use parking_lot::RwLock;

use crate::error::PolicyError;
use crate::rule::DefaultTaxRule;

/// Thread-safe registry of platform baseline tax rules.
#[derive(Debug, Default)]
pub struct DefaultPolicyRegistry {
    rules: RwLock<HashMap<(CountryId, Option<StateId>), DefaultTaxRule>>,
}

impl DefaultPolicyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the platform baseline seed.
    pub fn with_platform_baseline() -> Self {
        let registry = Self::new();
        for rule in crate::seed::platform_baseline_rules() {
            if let Err(err) = registry.upsert(rule) {
                unreachable!("baseline seed is internally consistent: {err}");
            }
        }
        registry
    }

    /// Insert or replace the rule at the rule's `(country, state)` scope.
    ///
    /// # Errors
    ///
    /// [`PolicyError::Validation`] for a bad label and
    /// [`PolicyError::FederalMethodForbidden`] for a federal rule carrying
    /// a calculation method. Rejected rules leave the registry unchanged.
    pub fn upsert(&self, rule: DefaultTaxRule) -> Result<(), PolicyError> {
        rule.validate()?;
        self.rules
            .write()
            .insert((rule.country_id, rule.state_id), rule);
        Ok(())
    }

    /// The federal baseline rule for a country, if one is configured.
    pub fn federal_default(&self, country_id: CountryId) -> Option<DefaultTaxRule> {
        self.rules.read().get(&(country_id, None)).cloned()
    }

    /// The baseline rule for a specific state, if one is configured.
    pub fn state_default(
        &self,
        country_id: CountryId,
        state_id: StateId,
    ) -> Option<DefaultTaxRule> {
        self.rules.read().get(&(country_id, Some(state_id))).cloned()
    }

    /// All baseline rules for a country: the federal rule first (when
    /// present), then state rules ordered by state name.
    ///
    /// # Errors
    ///
    /// [`PolicyError::Catalog`] when the country is not in the catalog.
    pub fn list_for_country(
        &self,
        country_id: CountryId,
        catalog: &JurisdictionCatalog,
    ) -> Result<Vec<DefaultTaxRule>, PolicyError> {
        let states = catalog.list_states(country_id)?;
        let rules = self.rules.read();

        let mut out = Vec::new();
        if let Some(federal) = rules.get(&(country_id, None)) {
            out.push(federal.clone());
        }
        for state in states {
            if let Some(rule) = rules.get(&(country_id, Some(state.id))) {
                out.push(rule.clone());
            }
        }
        Ok(out)
    }

    /// Total number of baseline rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Whether the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
