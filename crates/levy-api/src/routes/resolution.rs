//! # Resolved Tax View API
//!
//! HTTP surface over the resolution engine:
//!
//! - **GET `/v1/tax/overrides/store/:store_id/country/:country_id/states`**
//!   — the full per-state resolved view for a tenant, plus the federal
//!   entry
//! - **GET `/v1/tax/effective-rate/store/:store_id/state/:state_id`** —
//!   the single combined rate for a sale in that state
//!
//! Responses preserve the absent-vs-zero distinction: a scope with no
//! applicable rule is `null`, never a synthetic zero-rate entry.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use levy_core::{StateId, StoreId};
use levy_policy::{combine, EffectiveTaxEntry, RuleSource, StateResolution};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_store_access, CallerIdentity};
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A resolved tax entry as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EffectiveTaxDto {
    /// "federal" or "state".
    pub scope: String,
    /// The state, when state-scoped.
    pub state_id: Option<Uuid>,
    pub tax_label: String,
    /// Decimal string with two places (e.g. "18.00").
    pub tax_rate: String,
    pub calculation_method: Option<String>,
    /// Whether a tenant override supplied this entry.
    pub is_override: bool,
    /// The winning override's id, when `is_override` is true.
    pub override_id: Option<Uuid>,
}

impl From<&EffectiveTaxEntry> for EffectiveTaxDto {
    fn from(entry: &EffectiveTaxEntry) -> Self {
        let (is_override, override_id) = match entry.source {
            RuleSource::Default => (false, None),
            RuleSource::Override { override_id } => (true, Some(*override_id.as_uuid())),
        };
        Self {
            scope: if entry.scope.is_federal() { "federal" } else { "state" }.to_string(),
            state_id: entry.scope.state_id().map(|s| *s.as_uuid()),
            tax_label: entry.tax_label.clone(),
            tax_rate: entry.tax_rate.to_string(),
            calculation_method: entry.calculation_method.map(|m| m.as_str().to_string()),
            is_override,
            override_id,
        }
    }
}

/// One state's slot in the resolved view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolvedStateDto {
    pub state_id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: String,
    /// The effective entry, or `null` when no rule applies to this state.
    pub tax: Option<EffectiveTaxDto>,
}

impl From<&StateResolution> for ResolvedStateDto {
    fn from(resolved: &StateResolution) -> Self {
        Self {
            state_id: *resolved.state.id.as_uuid(),
            code: resolved.state.code.clone(),
            name: resolved.state.name.clone(),
            kind: resolved.state.kind.clone(),
            tax: resolved.entry.as_ref().map(EffectiveTaxDto::from),
        }
    }
}

/// The full resolved view for a tenant and country.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolvedCountryResponse {
    pub store_id: Uuid,
    pub country_id: Uuid,
    /// The federal entry, or `null` when no federal rule applies.
    pub federal_tax: Option<EffectiveTaxDto>,
    /// Every state of the country, name-ascending.
    pub states: Vec<ResolvedStateDto>,
}

/// The combined rate for a sale in one state.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EffectiveRateResponse {
    pub store_id: Uuid,
    pub country_id: Uuid,
    pub state_id: Uuid,
    /// Decimal string with two places; can exceed "100.00" for stacked
    /// rates.
    pub effective_rate: String,
    /// The entries the rate was combined from; both `null` means the sale
    /// is untaxed by omission.
    pub federal_tax: Option<EffectiveTaxDto>,
    pub state_tax: Option<EffectiveTaxDto>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the resolution router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/tax/overrides/store/{store_id}/country/{country_id}/states",
            get(resolved_states),
        )
        .route(
            "/v1/tax/effective-rate/store/{store_id}/state/{state_id}",
            get(effective_rate),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/tax/overrides/store/:store_id/country/:country_id/states —
/// The full resolved view for a tenant and country.
async fn resolved_states(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((store_id, country_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ResolvedCountryResponse>, AppError> {
    let store = StoreId::from(store_id);
    require_store_access(&caller, store)?;

    let resolution = state.engine.resolve(store, levy_core::CountryId::from(country_id))?;

    Ok(Json(ResolvedCountryResponse {
        store_id,
        country_id,
        federal_tax: resolution.federal.as_ref().map(EffectiveTaxDto::from),
        states: resolution.states.iter().map(ResolvedStateDto::from).collect(),
    }))
}

/// GET /v1/tax/effective-rate/store/:store_id/state/:state_id — The
/// combined rate applied to a sale in that state for that tenant.
async fn effective_rate(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((store_id, state_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EffectiveRateResponse>, AppError> {
    let store = StoreId::from(store_id);
    require_store_access(&caller, store)?;

    let sid = StateId::from(state_id);
    let catalog_state = state.catalog.get_state(sid)?;
    let resolution = state.engine.resolve(store, catalog_state.country_id)?;

    let state_entry = resolution
        .states
        .iter()
        .find(|s| s.state.id == sid)
        .and_then(|s| s.entry.as_ref());
    let rate = combine(resolution.federal.as_ref(), state_entry)?;

    Ok(Json(EffectiveRateResponse {
        store_id,
        country_id: *catalog_state.country_id.as_uuid(),
        state_id,
        effective_rate: rate.to_string(),
        federal_tax: resolution.federal.as_ref().map(EffectiveTaxDto::from),
        state_tax: state_entry.map(EffectiveTaxDto::from),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
