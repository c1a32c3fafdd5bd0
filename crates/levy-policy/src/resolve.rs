//! # Resolution Engine
//!
//! Merges the jurisdiction catalog, the default policy registry, and the
//! tenant override registry into the *effective* tax view for a tenant and
//! country, and combines a federal and a state rate into the single rate
//! applied to a sale.
//!
//! ## Precedence
//!
//! Applied identically at both scopes: an override strictly dominates the
//! default, replacing the entire rule — label, rate, and method. No
//! partial-field merging occurs, so no hybrid of override and default can
//! ever be observed. A scope with neither an override nor a default
//! resolves to `None`: "untaxed by omission" is a legitimate terminal
//! state, distinct from an explicit zero-rate policy, and is never
//! collapsed into a synthetic zero.
//!
//! ## Combination
//!
//! [`combine`] composes the two scopes by the state entry's calculation
//! method (`added` when the method is null). The formula is inferred from
//! the stored policy fields; deployments should validate it against the
//! applicable tax requirements before relying on it at checkout.
//!
//! Resolution is stateless, idempotent, and side-effect-free: it reads
//! current registry contents, takes no locks across reads, and caches
//! nothing.

use std::sync::Arc;

use levy_catalog::{JurisdictionCatalog, State};
use levy_core::{CalculationMethod, CountryId, EffectiveRate, OverrideId, RatePercent, StateId, StoreId};
use serde::{Deserialize, Serialize};

use crate::defaults::DefaultPolicyRegistry;
use crate::error::PolicyError;
use crate::overrides::OverrideRegistry;
use crate::rule::{DefaultTaxRule, TaxScope, TenantTaxOverride};

/// Where a resolved entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    /// The platform baseline supplied the rule.
    Default,
    /// A tenant override supplied the rule.
    Override {
        /// The override row that won.
        override_id: OverrideId,
    },
}

impl RuleSource {
    /// The winning override's id, when sourced from an override.
    pub fn override_id(&self) -> Option<OverrideId> {
        match self {
            Self::Default => None,
            Self::Override { override_id } => Some(*override_id),
        }
    }
}

/// The resolved rule actually in force for one tenant at one scope.
///
/// Derived on every query, never persisted — it always reflects the latest
/// registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveTaxEntry {
    /// The scope this entry applies to.
    pub scope: TaxScope,
    /// Display label from the winning rule.
    pub tax_label: String,
    /// Rate from the winning rule.
    pub tax_rate: RatePercent,
    /// Combination method from the winning rule.
    pub calculation_method: Option<CalculationMethod>,
    /// Which layer the winning rule came from.
    pub source: RuleSource,
}

impl EffectiveTaxEntry {
    fn from_default(rule: DefaultTaxRule) -> Self {
        Self {
            scope: TaxScope::from_state_id(rule.state_id),
            tax_label: rule.tax_label,
            tax_rate: rule.tax_rate,
            calculation_method: rule.calculation_method,
            source: RuleSource::Default,
        }
    }

    fn from_override(row: TenantTaxOverride) -> Self {
        Self {
            scope: TaxScope::from_state_id(row.state_id),
            tax_label: row.tax_label,
            tax_rate: row.tax_rate,
            calculation_method: row.calculation_method,
            source: RuleSource::Override { override_id: row.id },
        }
    }
}

/// One state's slot in a resolved country view. `entry` is `None` when the
/// state has neither a default nor an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResolution {
    /// The catalog state record.
    pub state: State,
    /// The effective entry, when any rule applies.
    pub entry: Option<EffectiveTaxEntry>,
}

/// The full resolved view for a tenant and country: the federal slot plus
/// every state of the country (catalog-defined, name-ordered), each with
/// its effective entry or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResolution {
    /// The country being resolved.
    pub country_id: CountryId,
    /// The federal effective entry, when any federal rule applies.
    pub federal: Option<EffectiveTaxEntry>,
    /// Every state of the country, name-ascending.
    pub states: Vec<StateResolution>,
}

/// Stateless resolution over the catalog and the two registries.
///
/// Cheap to clone: holds shared handles only.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    catalog: Arc<JurisdictionCatalog>,
    defaults: Arc<DefaultPolicyRegistry>,
    overrides: Arc<OverrideRegistry>,
}

impl ResolutionEngine {
    /// Create an engine over shared registry handles.
    pub fn new(
        catalog: Arc<JurisdictionCatalog>,
        defaults: Arc<DefaultPolicyRegistry>,
        overrides: Arc<OverrideRegistry>,
    ) -> Self {
        Self {
            catalog,
            defaults,
            overrides,
        }
    }

    /// Resolve the effective tax view for a tenant and country.
    ///
    /// # Errors
    ///
    /// [`PolicyError::Catalog`] when the country is unknown;
    /// [`PolicyError::InvariantViolation`] when stored data violates the
    /// federal-method invariant (corrupt data — writes enforce it).
    pub fn resolve(
        &self,
        store_id: StoreId,
        country_id: CountryId,
    ) -> Result<CountryResolution, PolicyError> {
        self.resolve_inner(Some(store_id), country_id)
    }

    /// Resolve the platform-wide default view for a country: the same shape
    /// as [`ResolutionEngine::resolve`] with the override layer skipped.
    ///
    /// # Errors
    ///
    /// Same as [`ResolutionEngine::resolve`].
    pub fn resolve_defaults(&self, country_id: CountryId) -> Result<CountryResolution, PolicyError> {
        self.resolve_inner(None, country_id)
    }

    fn resolve_inner(
        &self,
        store_id: Option<StoreId>,
        country_id: CountryId,
    ) -> Result<CountryResolution, PolicyError> {
        // The catalog defines the output set: every state appears, whether
        // or not any rule exists for it.
        let states = self.catalog.list_states(country_id)?;

        let federal = self.scope_entry(store_id, country_id, None)?;

        let mut resolved_states = Vec::with_capacity(states.len());
        for state in states {
            let entry = self.scope_entry(store_id, country_id, Some(state.id))?;
            resolved_states.push(StateResolution { state, entry });
        }

        Ok(CountryResolution {
            country_id,
            federal,
            states: resolved_states,
        })
    }

    /// Resolve one scope: override if present, else default, else `None`.
    fn scope_entry(
        &self,
        store_id: Option<StoreId>,
        country_id: CountryId,
        state_id: Option<StateId>,
    ) -> Result<Option<EffectiveTaxEntry>, PolicyError> {
        let winner = store_id
            .and_then(|store| self.overrides.find(store, country_id, state_id))
            .map(EffectiveTaxEntry::from_override)
            .or_else(|| {
                let default = match state_id {
                    None => self.defaults.federal_default(country_id),
                    Some(state) => self.defaults.state_default(country_id, state),
                };
                default.map(EffectiveTaxEntry::from_default)
            });

        if let Some(entry) = &winner {
            if entry.scope.is_federal() && entry.calculation_method.is_some() {
                tracing::error!(
                    country_id = %country_id,
                    source = ?entry.source,
                    "federal tax entry carries a calculation method — stored policy data is corrupt"
                );
                return Err(PolicyError::InvariantViolation(
                    "federal tax entry carries a calculation method".to_string(),
                ));
            }
        }
        Ok(winner)
    }

    /// The single combined rate for a sale in the given state, for the
    /// given tenant: resolves both scopes and applies [`combine`].
    ///
    /// # Errors
    ///
    /// [`PolicyError::Catalog`] when the state (or its country) is
    /// unknown; [`PolicyError::InvariantViolation`] as in
    /// [`ResolutionEngine::resolve`].
    pub fn effective_rate(
        &self,
        store_id: StoreId,
        state_id: StateId,
    ) -> Result<EffectiveRate, PolicyError> {
        let state = self.catalog.get_state(state_id)?;
        let federal = self.scope_entry(Some(store_id), state.country_id, None)?;
        let state_entry = self.scope_entry(Some(store_id), state.country_id, Some(state_id))?;
        combine(federal.as_ref(), state_entry.as_ref())
    }
}

/// Combine a federal and a state effective entry into the rate applied to
/// a sale in that state.
///
/// With `f` = federal rate (0 if absent), `s` = state rate, and `m` the
/// state entry's method (`added` when null):
///
/// - no state entry → `f`
/// - `added` → `f + s` (both levied on the same base)
/// - `instead` → `s` (state supersedes federal)
/// - `compounded` → `f + s + f·s/100` (state tax on the federal-inclusive
///   amount; the cross term is rounded half-up at hundredth-of-a-percent
///   precision)
///
/// # Errors
///
/// [`PolicyError::InvariantViolation`] when the federal entry carries a
/// calculation method — that is corrupt stored data, not a combination
/// rule to guess at.
pub fn combine(
    federal: Option<&EffectiveTaxEntry>,
    state: Option<&EffectiveTaxEntry>,
) -> Result<EffectiveRate, PolicyError> {
    if let Some(entry) = federal {
        if entry.calculation_method.is_some() {
            return Err(PolicyError::InvariantViolation(
                "federal tax entry carries a calculation method".to_string(),
            ));
        }
    }

    let f = federal.map_or(0, |e| e.tax_rate.as_centi());

    let Some(state_entry) = state else {
        return Ok(EffectiveRate::from_centi(f));
    };
    let s = state_entry.tax_rate.as_centi();

    let combined = match state_entry.calculation_method.unwrap_or(CalculationMethod::Added) {
        CalculationMethod::Added => f + s,
        CalculationMethod::Instead => s,
        CalculationMethod::Compounded => f + s + cross_term(f, s),
    };
    Ok(EffectiveRate::from_centi(combined))
}

/// The compounding correction term `f·s/100` in hundredths of a percent,
/// rounded half-up. Computed in `i128` so the product cannot overflow.
fn cross_term(f_centi: i64, s_centi: i64) -> i64 {
    let product = i128::from(f_centi) * i128::from(s_centi);
    let rounded = (product + 5_000) / 10_000;
    // Stored rates are bounded by 100%, so the term fits in i64.
    rounded as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::{NewOverride, OverridePatch};
    use crate::rule::DefaultTaxRule;
    use levy_catalog::seed::{self, INDIA, KARNATAKA, MAHARASHTRA, TAMIL_NADU};

    fn engine() -> (ResolutionEngine, Arc<DefaultPolicyRegistry>, Arc<OverrideRegistry>) {
        let catalog = Arc::new(seed::reference_catalog());
        let defaults = Arc::new(DefaultPolicyRegistry::new());
        let overrides = Arc::new(OverrideRegistry::new());
        let engine = ResolutionEngine::new(catalog, Arc::clone(&defaults), Arc::clone(&overrides));
        (engine, defaults, overrides)
    }

    fn default_rule(
        state_id: Option<StateId>,
        label: &str,
        rate: &str,
        method: Option<CalculationMethod>,
    ) -> DefaultTaxRule {
        DefaultTaxRule {
            country_id: INDIA,
            state_id,
            tax_label: label.into(),
            tax_rate: RatePercent::parse(rate).unwrap(),
            calculation_method: method,
        }
    }

    fn entry(scope: TaxScope, rate: &str, method: Option<CalculationMethod>) -> EffectiveTaxEntry {
        EffectiveTaxEntry {
            scope,
            tax_label: "Tax".into(),
            tax_rate: RatePercent::parse(rate).unwrap(),
            calculation_method: method,
            source: RuleSource::Default,
        }
    }

    // -- combine --

    #[test]
    fn combine_added() {
        let f = entry(TaxScope::Federal, "9", None);
        let s = entry(TaxScope::State(StateId::new()), "18", Some(CalculationMethod::Added));
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "27.00");
    }

    #[test]
    fn combine_instead() {
        let f = entry(TaxScope::Federal, "9", None);
        let s = entry(TaxScope::State(StateId::new()), "18", Some(CalculationMethod::Instead));
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "18.00");
    }

    #[test]
    fn combine_compounded() {
        let f = entry(TaxScope::Federal, "9", None);
        let s = entry(
            TaxScope::State(StateId::new()),
            "18",
            Some(CalculationMethod::Compounded),
        );
        // 9 + 18 + 9*18/100 = 28.62
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "28.62");
    }

    #[test]
    fn combine_no_state_entry() {
        let f = entry(TaxScope::Federal, "9", None);
        assert_eq!(combine(Some(&f), None).unwrap().to_string(), "9.00");
    }

    #[test]
    fn combine_null_method_is_added() {
        let f = entry(TaxScope::Federal, "9", None);
        let s = entry(TaxScope::State(StateId::new()), "18", None);
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "27.00");
    }

    #[test]
    fn combine_absent_federal() {
        let s = entry(TaxScope::State(StateId::new()), "7.25", Some(CalculationMethod::Added));
        assert_eq!(combine(None, Some(&s)).unwrap().to_string(), "7.25");
    }

    #[test]
    fn combine_both_absent_is_zero() {
        assert_eq!(combine(None, None).unwrap(), EffectiveRate::ZERO);
    }

    #[test]
    fn combine_rejects_federal_method() {
        let f = entry(TaxScope::Federal, "9", Some(CalculationMethod::Added));
        let s = entry(TaxScope::State(StateId::new()), "18", None);
        assert!(matches!(
            combine(Some(&f), Some(&s)),
            Err(PolicyError::InvariantViolation(_))
        ));
    }

    #[test]
    fn combine_compounded_rounds_half_up() {
        let f = entry(TaxScope::Federal, "9", None);
        let s = entry(
            TaxScope::State(StateId::new()),
            "18.50",
            Some(CalculationMethod::Compounded),
        );
        // Cross term 9 * 18.5 / 100 = 1.665 → 1.67 after half-up rounding.
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "29.17");
    }

    #[test]
    fn combine_can_exceed_hundred() {
        let f = entry(TaxScope::Federal, "60", None);
        let s = entry(TaxScope::State(StateId::new()), "60", Some(CalculationMethod::Added));
        assert_eq!(combine(Some(&f), Some(&s)).unwrap().to_string(), "120.00");
    }

    // -- resolve --

    #[test]
    fn resolve_covers_every_catalog_state() {
        let (engine, _, _) = engine();
        let resolved = engine.resolve(StoreId::new(), INDIA).unwrap();

        assert_eq!(resolved.states.len(), 3);
        let names: Vec<&str> = resolved.states.iter().map(|s| s.state.name.as_str()).collect();
        assert_eq!(names, ["Karnataka", "Maharashtra", "Tamil Nadu"]);
        // Nothing configured: every slot is undefined, not zero.
        assert!(resolved.federal.is_none());
        assert!(resolved.states.iter().all(|s| s.entry.is_none()));
    }

    #[test]
    fn resolve_unknown_country() {
        let (engine, _, _) = engine();
        assert!(matches!(
            engine.resolve(StoreId::new(), CountryId::new()),
            Err(PolicyError::Catalog(_))
        ));
    }

    #[test]
    fn default_fallback_is_exact() {
        let (engine, defaults, _) = engine();
        defaults.upsert(default_rule(None, "Federal GST", "9", None)).unwrap();
        defaults
            .upsert(default_rule(Some(MAHARASHTRA), "IGST", "18", Some(CalculationMethod::Instead)))
            .unwrap();

        let resolved = engine.resolve(StoreId::new(), INDIA).unwrap();
        let federal = resolved.federal.unwrap();
        assert_eq!(federal.tax_label, "Federal GST");
        assert_eq!(federal.tax_rate.as_centi(), 900);
        assert_eq!(federal.source, RuleSource::Default);

        let mh = resolved
            .states
            .iter()
            .find(|s| s.state.id == MAHARASHTRA)
            .unwrap();
        let mh_entry = mh.entry.as_ref().unwrap();
        assert_eq!(mh_entry.tax_label, "IGST");
        assert_eq!(mh_entry.calculation_method, Some(CalculationMethod::Instead));
        assert_eq!(mh_entry.source, RuleSource::Default);

        // States without rules stay undefined.
        let ka = resolved.states.iter().find(|s| s.state.id == KARNATAKA).unwrap();
        assert!(ka.entry.is_none());
    }

    #[test]
    fn override_dominates_whole_rule() {
        let (engine, defaults, overrides) = engine();
        let store = StoreId::new();
        defaults
            .upsert(default_rule(Some(MAHARASHTRA), "IGST", "18", Some(CalculationMethod::Instead)))
            .unwrap();
        let row = overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Negotiated GST".into(),
                tax_rate: RatePercent::parse("20").unwrap(),
                calculation_method: Some(CalculationMethod::Added),
            })
            .unwrap();

        let resolved = engine.resolve(store, INDIA).unwrap();
        let mh = resolved
            .states
            .iter()
            .find(|s| s.state.id == MAHARASHTRA)
            .unwrap()
            .entry
            .as_ref()
            .unwrap();

        // Every field comes from the override — no mixing with the default.
        assert_eq!(mh.tax_label, "Negotiated GST");
        assert_eq!(mh.tax_rate.as_centi(), 2000);
        assert_eq!(mh.calculation_method, Some(CalculationMethod::Added));
        assert_eq!(mh.source, RuleSource::Override { override_id: row.id });
        assert_eq!(mh.source.override_id(), Some(row.id));
    }

    #[test]
    fn override_is_tenant_scoped() {
        let (engine, defaults, overrides) = engine();
        let store_a = StoreId::new();
        let store_b = StoreId::new();
        defaults
            .upsert(default_rule(Some(MAHARASHTRA), "IGST", "18", None))
            .unwrap();
        overrides
            .create(NewOverride {
                store_id: store_a,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Custom".into(),
                tax_rate: RatePercent::parse("20").unwrap(),
                calculation_method: None,
            })
            .unwrap();

        let b_view = engine.resolve(store_b, INDIA).unwrap();
        let mh = b_view
            .states
            .iter()
            .find(|s| s.state.id == MAHARASHTRA)
            .unwrap()
            .entry
            .as_ref()
            .unwrap();
        assert_eq!(mh.source, RuleSource::Default);
        assert_eq!(mh.tax_rate.as_centi(), 1800);
    }

    #[test]
    fn resolve_defaults_skips_overrides() {
        let (engine, defaults, overrides) = engine();
        defaults.upsert(default_rule(None, "Federal GST", "9", None)).unwrap();
        overrides
            .create(NewOverride {
                store_id: StoreId::new(),
                country_id: INDIA,
                state_id: None,
                tax_label: "Custom".into(),
                tax_rate: RatePercent::parse("5").unwrap(),
                calculation_method: None,
            })
            .unwrap();

        let resolved = engine.resolve_defaults(INDIA).unwrap();
        let federal = resolved.federal.unwrap();
        assert_eq!(federal.source, RuleSource::Default);
        assert_eq!(federal.tax_rate.as_centi(), 900);
    }

    #[test]
    fn resolve_is_idempotent() {
        let (engine, defaults, overrides) = engine();
        let store = StoreId::new();
        defaults.upsert(default_rule(None, "Federal GST", "9", None)).unwrap();
        defaults
            .upsert(default_rule(Some(TAMIL_NADU), "TN GST", "18", None))
            .unwrap();
        overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Custom".into(),
                tax_rate: RatePercent::parse("20").unwrap(),
                calculation_method: Some(CalculationMethod::Added),
            })
            .unwrap();

        let first = engine.resolve(store, INDIA).unwrap();
        let second = engine.resolve(store, INDIA).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bulk_reset_restores_defaults() {
        let (engine, defaults, overrides) = engine();
        let store = StoreId::new();
        defaults.upsert(default_rule(None, "Federal GST", "9", None)).unwrap();
        defaults
            .upsert(default_rule(Some(MAHARASHTRA), "IGST", "18", Some(CalculationMethod::Instead)))
            .unwrap();
        overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: None,
                tax_label: "Custom federal".into(),
                tax_rate: RatePercent::parse("4").unwrap(),
                calculation_method: None,
            })
            .unwrap();
        overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Custom MH".into(),
                tax_rate: RatePercent::parse("22").unwrap(),
                calculation_method: Some(CalculationMethod::Added),
            })
            .unwrap();

        assert_eq!(overrides.delete_all(store, INDIA), 2);

        let resolved = engine.resolve(store, INDIA).unwrap();
        assert_eq!(resolved.federal.as_ref().unwrap().source, RuleSource::Default);
        let mh = resolved
            .states
            .iter()
            .find(|s| s.state.id == MAHARASHTRA)
            .unwrap()
            .entry
            .as_ref()
            .unwrap();
        assert_eq!(mh.source, RuleSource::Default);
        assert_eq!(mh.tax_label, "IGST");
    }

    #[test]
    fn effective_rate_end_to_end() {
        // The concrete scenario: India federal 9 (no method), Maharashtra
        // default 18 instead; tenant then overrides Maharashtra to 20 added.
        let (engine, defaults, overrides) = engine();
        let store = StoreId::new();
        defaults.upsert(default_rule(None, "Federal GST", "9", None)).unwrap();
        defaults
            .upsert(default_rule(Some(MAHARASHTRA), "IGST", "18", Some(CalculationMethod::Instead)))
            .unwrap();

        assert_eq!(
            engine.effective_rate(store, MAHARASHTRA).unwrap().to_string(),
            "18.00"
        );

        overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Negotiated GST".into(),
                tax_rate: RatePercent::parse("20").unwrap(),
                calculation_method: Some(CalculationMethod::Added),
            })
            .unwrap();

        assert_eq!(
            engine.effective_rate(store, MAHARASHTRA).unwrap().to_string(),
            "29.00"
        );
        // The federal slot is untouched by the state override.
        let resolved = engine.resolve(store, INDIA).unwrap();
        let federal = resolved.federal.unwrap();
        assert_eq!(federal.source, RuleSource::Default);
        assert_eq!(federal.tax_rate.as_centi(), 900);
    }

    #[test]
    fn effective_rate_unknown_state() {
        let (engine, _, _) = engine();
        assert!(matches!(
            engine.effective_rate(StoreId::new(), StateId::new()),
            Err(PolicyError::Catalog(_))
        ));
    }

    #[test]
    fn effective_rate_no_rules_is_zero_from_absence() {
        // Both scopes undefined: the *rate* is zero but the resolved view
        // keeps the distinction (both entries are None).
        let (engine, _, _) = engine();
        let store = StoreId::new();
        assert_eq!(
            engine.effective_rate(store, KARNATAKA).unwrap(),
            EffectiveRate::ZERO
        );
        let resolved = engine.resolve(store, INDIA).unwrap();
        assert!(resolved.federal.is_none());
    }

    #[test]
    fn updated_override_feeds_resolution() {
        let (engine, _, overrides) = engine();
        let store = StoreId::new();
        let row = overrides
            .create(NewOverride {
                store_id: store,
                country_id: INDIA,
                state_id: Some(MAHARASHTRA),
                tax_label: "Custom".into(),
                tax_rate: RatePercent::parse("20").unwrap(),
                calculation_method: None,
            })
            .unwrap();

        overrides
            .update(
                row.id,
                OverridePatch {
                    tax_rate: Some(RatePercent::parse("21").unwrap()),
                    ..OverridePatch::default()
                },
            )
            .unwrap();

        let resolved = engine.resolve(store, INDIA).unwrap();
        let mh = resolved
            .states
            .iter()
            .find(|s| s.state.id == MAHARASHTRA)
            .unwrap()
            .entry
            .as_ref()
            .unwrap();
        assert_eq!(mh.tax_rate.as_centi(), 2100);
    }
}
