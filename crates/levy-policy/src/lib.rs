#![deny(missing_docs)]

//! # levy-policy — Tax Policy Registries & Resolution Engine
//!
//! The algorithmic core of the tax subsystem. Two registries hold rate
//! policy at two granularities, and a stateless engine merges them:
//!
//! 1. **Default Policy Registry** ([`DefaultPolicyRegistry`]) — the
//!    platform-wide baseline: per country, one optional federal rule plus
//!    zero or more state-level rules. Never tenant-aware.
//!
//! 2. **Tenant Override Registry** ([`OverrideRegistry`]) — per-tenant
//!    customizations at the same two granularities, keyed by
//!    `(store_id, country_id, state_id)` with a uniqueness guarantee.
//!
//! 3. **Resolution Engine** ([`ResolutionEngine`]) — a pure function over
//!    the catalog and both registries. An override strictly dominates the
//!    default at its scope (whole-rule replacement, no field merging); a
//!    scope with neither is *undefined*, a legitimate terminal state that
//!    is never collapsed into a zero rate.
//!
//! ## Determinism
//!
//! Resolution and combination are deterministic: given identical registry
//! contents, the output is always the same. There is no internal mutable
//! state, output ordering follows the catalog's name ordering, and all
//! rate arithmetic is fixed-point.

pub mod defaults;
pub mod error;
pub mod overrides;
pub mod resolve;
pub mod rule;
pub mod seed;

pub use defaults::DefaultPolicyRegistry;
pub use error::PolicyError;
pub use overrides::{NewOverride, OverridePatch, OverrideRegistry};
pub use resolve::{
    combine, CountryResolution, EffectiveTaxEntry, ResolutionEngine, RuleSource, StateResolution,
};
pub use rule::{DefaultTaxRule, TaxScope, TenantTaxOverride};
