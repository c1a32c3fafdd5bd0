//! # Platform Tax Defaults API
//!
//! HTTP surface over the Default Policy Registry:
//!
//! - **GET `/v1/tax/defaults/country/:country_id`** — effective default
//!   entries for a country (federal first, then states by name). With
//!   `?store_id=`, the view is merged with that tenant's overrides and
//!   entries are tagged with their provenance.
//! - **PUT `/v1/tax/defaults`** — platform-operator upsert of a baseline
//!   rule.
//!
//! The registry is the single source of baseline truth: there is no
//! country-name special-casing anywhere behind these endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use levy_core::{CountryId, RatePercent, StateId, StoreId};
use levy_policy::{CountryResolution, DefaultTaxRule};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, require_store_access, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::overrides::parse_method;
use crate::routes::resolution::EffectiveTaxDto;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to upsert a platform baseline rule.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertDefaultRequest {
    /// Country the rule applies to.
    pub country_id: Uuid,
    /// State the rule applies to; omit for the federal rule.
    pub state_id: Option<Uuid>,
    /// Display label (e.g. "IGST").
    pub tax_label: String,
    /// Rate as a decimal string, 0-100 (e.g. "18", "7.25").
    pub tax_rate: String,
    /// "added", "instead", or "compounded"; must be omitted for the
    /// federal rule.
    pub calculation_method: Option<String>,
}

impl Validate for UpsertDefaultRequest {
    fn validate(&self) -> Result<(), String> {
        if self.tax_label.trim().is_empty() {
            return Err("tax_label must not be empty".to_string());
        }
        if self.tax_label.len() > 120 {
            return Err("tax_label must not exceed 120 characters".to_string());
        }
        if self.tax_rate.trim().is_empty() {
            return Err("tax_rate must not be empty".to_string());
        }
        Ok(())
    }
}

/// A stored baseline rule as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DefaultRuleResponse {
    pub country_id: Uuid,
    pub state_id: Option<Uuid>,
    pub tax_label: String,
    pub tax_rate: String,
    pub calculation_method: Option<String>,
}

impl From<&DefaultTaxRule> for DefaultRuleResponse {
    fn from(rule: &DefaultTaxRule) -> Self {
        Self {
            country_id: *rule.country_id.as_uuid(),
            state_id: rule.state_id.map(|s| *s.as_uuid()),
            tax_label: rule.tax_label.clone(),
            tax_rate: rule.tax_rate.to_string(),
            calculation_method: rule.calculation_method.map(|m| m.as_str().to_string()),
        }
    }
}

/// One effective entry in the country defaults listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EffectiveDefaultEntry {
    /// State metadata, `null` for the federal entry.
    pub state_code: Option<String>,
    pub state_name: Option<String>,
    /// The effective rule at this scope.
    #[serde(flatten)]
    pub tax: EffectiveTaxDto,
}

/// Query parameters for the country defaults listing.
#[derive(Debug, Deserialize, Default)]
pub struct DefaultsQueryParams {
    /// Merge this tenant's overrides into the view.
    pub store_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the defaults router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tax/defaults", put(upsert_default))
        .route("/v1/tax/defaults/country/{country_id}", get(list_country_defaults))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/tax/defaults/country/:country_id — Effective default entries
/// for a country, optionally merged with a tenant's overrides.
async fn list_country_defaults(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(country_id): Path<Uuid>,
    Query(params): Query<DefaultsQueryParams>,
) -> Result<Json<Vec<EffectiveDefaultEntry>>, AppError> {
    let country = CountryId::from(country_id);

    let resolution = match params.store_id {
        Some(raw) => {
            let store = StoreId::from(raw);
            require_store_access(&caller, store)?;
            state.engine.resolve(store, country)?
        }
        None => state.engine.resolve_defaults(country)?,
    };

    Ok(Json(flatten_resolution(&resolution)))
}

/// Flatten a resolution into the listing shape: federal first (when
/// present), then configured state entries in the resolution's name order.
fn flatten_resolution(resolution: &CountryResolution) -> Vec<EffectiveDefaultEntry> {
    let mut entries = Vec::new();
    if let Some(federal) = &resolution.federal {
        entries.push(EffectiveDefaultEntry {
            state_code: None,
            state_name: None,
            tax: EffectiveTaxDto::from(federal),
        });
    }
    for resolved in &resolution.states {
        if let Some(entry) = &resolved.entry {
            entries.push(EffectiveDefaultEntry {
                state_code: Some(resolved.state.code.clone()),
                state_name: Some(resolved.state.name.clone()),
                tax: EffectiveTaxDto::from(entry),
            });
        }
    }
    entries
}

/// PUT /v1/tax/defaults — Upsert a platform baseline rule.
///
/// Platform administrators only. The jurisdiction must exist in the
/// catalog; the rate and method are validated before anything is stored.
async fn upsert_default(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpsertDefaultRequest>, JsonRejection>,
) -> Result<Json<DefaultRuleResponse>, AppError> {
    require_role(&caller, Role::PlatformAdmin)?;
    let req = extract_validated_json(body)?;

    let country_id = CountryId::from(req.country_id);
    state.catalog.get_country(country_id)?;

    let state_id = match req.state_id {
        Some(raw) => {
            let sid = StateId::from(raw);
            let catalog_state = state.catalog.get_state(sid)?;
            if catalog_state.country_id != country_id {
                return Err(AppError::Validation(format!(
                    "state {sid} does not belong to country {country_id}"
                )));
            }
            Some(sid)
        }
        None => None,
    };

    let rule = DefaultTaxRule {
        country_id,
        state_id,
        tax_label: req.tax_label,
        tax_rate: RatePercent::parse(&req.tax_rate)?,
        calculation_method: parse_method(req.calculation_method.as_deref())?,
    };
    state.defaults.upsert(rule.clone())?;

    // Write-through. Failure is surfaced because the in-memory rule would
    // be lost on restart, silently reverting the operator's change.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::defaults::upsert(pool, &rule).await {
            tracing::error!(country_id = %country_id, error = %e, "failed to persist default tax rule");
            return Err(AppError::Internal(
                "default rule stored in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(DefaultRuleResponse::from(&rule)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
