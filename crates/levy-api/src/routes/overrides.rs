//! # Tenant Tax Override API
//!
//! HTTP surface over the Tenant Override Registry:
//!
//! - **POST `/v1/tax/overrides`** — create an override (409 on duplicate
//!   scope key)
//! - **PUT `/v1/tax/overrides/:id`** — partial update of label/rate/method
//! - **DELETE `/v1/tax/overrides/:id`** — delete one override
//! - **GET `/v1/tax/overrides/store/:store_id/country/:country_id`** —
//!   list a tenant's overrides for a country
//! - **DELETE `/v1/tax/overrides/store/:store_id/country/:country_id`** —
//!   bulk reset to platform defaults; returns the deleted count
//!
//! Create is not an upsert: clobbering an existing customization requires
//! an explicit update call against its id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use levy_core::{CalculationMethod, CountryId, OverrideId, RatePercent, StateId, StoreId};
use levy_policy::{NewOverride, OverridePatch, TenantTaxOverride};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_store_access, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to create a tenant tax override.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOverrideRequest {
    /// The owning tenant.
    pub store_id: Uuid,
    /// The country the override applies to.
    pub country_id: Uuid,
    /// The state the override applies to; omit to override the federal
    /// rule.
    pub state_id: Option<Uuid>,
    /// Display label (e.g. "Negotiated GST").
    pub tax_label: String,
    /// Rate as a decimal string, 0-100.
    pub tax_rate: String,
    /// "added", "instead", or "compounded"; must be omitted at federal
    /// scope.
    pub calculation_method: Option<String>,
}

impl Validate for CreateOverrideRequest {
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

/// Request to partially update an override.
///
/// Omitted fields are left unchanged. `calculation_method` distinguishes
/// omitted (unchanged) from explicit JSON `null` (clear the method).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOverrideRequest {
    /// Replacement label.
    pub tax_label: Option<String>,
    /// Replacement rate as a decimal string.
    pub tax_rate: Option<String>,
    /// Replacement method; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub calculation_method: Option<Option<String>>,
}

/// Deserialize a present field (including an explicit `null`) into the
/// outer `Some`, so that an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl Validate for UpdateOverrideRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref label) = self.tax_label {
            if label.trim().is_empty() {
                return Err("tax_label must not be empty".to_string());
            }
            if label.len() > 120 {
                return Err("tax_label must not exceed 120 characters".to_string());
            }
        }
        if let Some(ref rate) = self.tax_rate {
            if rate.trim().is_empty() {
                return Err("tax_rate must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// A tenant tax override as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverrideResponse {
    pub id: Uuid,
    pub store_id: Uuid,
    pub country_id: Uuid,
    pub state_id: Option<Uuid>,
    pub tax_label: String,
    pub tax_rate: String,
    pub calculation_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TenantTaxOverride> for OverrideResponse {
    fn from(row: &TenantTaxOverride) -> Self {
        Self {
            id: *row.id.as_uuid(),
            store_id: *row.store_id.as_uuid(),
            country_id: *row.country_id.as_uuid(),
            state_id: row.state_id.map(|s| *s.as_uuid()),
            tax_label: row.tax_label.clone(),
            tax_rate: row.tax_rate.to_string(),
            calculation_method: row.calculation_method.map(|m| m.as_str().to_string()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Response for the bulk reset endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponse {
    /// Number of overrides removed.
    pub deleted: usize,
}

/// Query parameters for the override listing.
#[derive(Debug, Deserialize, Default)]
pub struct OverrideQueryParams {
    /// Narrow the listing to one state.
    pub state_id: Option<Uuid>,
}

/// Parse an optional calculation method string.
pub(crate) fn parse_method(s: Option<&str>) -> Result<Option<CalculationMethod>, AppError> {
    match s {
        None => Ok(None),
        Some(raw) => raw
            .parse::<CalculationMethod>()
            .map(Some)
            .map_err(AppError::from),
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Construct the overrides router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tax/overrides", post(create_override))
        .route(
            "/v1/tax/overrides/{id}",
            put(update_override).delete(delete_override),
        )
        .route(
            "/v1/tax/overrides/store/{store_id}/country/{country_id}",
            get(list_overrides).delete(bulk_delete_overrides),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/tax/overrides — Create a tenant tax override.
async fn create_override(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateOverrideRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OverrideResponse>), AppError> {
    let req = extract_validated_json(body)?;

    let store_id = StoreId::from(req.store_id);
    require_store_access(&caller, store_id)?;

    let country_id = CountryId::from(req.country_id);
    state.catalog.get_country(country_id)?;
    let state_id = validate_state_ref(&state, country_id, req.state_id)?;

    let row = state.overrides.create(NewOverride {
        store_id,
        country_id,
        state_id,
        tax_label: req.tax_label,
        tax_rate: RatePercent::parse(&req.tax_rate)?,
        calculation_method: parse_method(req.calculation_method.as_deref())?,
    })?;

    // Write-through. The scope unique index is the cross-process
    // tiebreaker: losing that race rolls back the in-memory row and
    // reports the same conflict a local duplicate would.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::overrides::insert(pool, &row).await {
            let _ = state.overrides.delete(row.id);
            if crate::db::overrides::is_unique_violation(&e) {
                return Err(AppError::Conflict(
                    "an override already exists for this store, country, and scope".to_string(),
                ));
            }
            tracing::error!(override_id = %row.id, error = %e, "failed to persist tax override");
            return Err(AppError::Internal(
                "override recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(OverrideResponse::from(&row))))
}

/// PUT /v1/tax/overrides/:id — Partially update an override.
async fn update_override(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateOverrideRequest>, JsonRejection>,
) -> Result<Json<OverrideResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let override_id = OverrideId::from(id);

    let existing = state
        .overrides
        .get(override_id)
        .ok_or_else(|| AppError::NotFound(format!("override {override_id} not found")))?;
    require_store_access(&caller, existing.store_id)?;

    let patch = OverridePatch {
        tax_label: req.tax_label,
        tax_rate: req
            .tax_rate
            .as_deref()
            .map(RatePercent::parse)
            .transpose()?,
        calculation_method: match req.calculation_method {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(parse_method(Some(raw.as_str()))?),
        },
    };

    let updated = state.overrides.update(override_id, patch)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::overrides::update(pool, &updated).await {
            tracing::error!(override_id = %override_id, error = %e, "failed to persist tax override update");
            return Err(AppError::Internal(
                "override updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(OverrideResponse::from(&updated)))
}

/// DELETE /v1/tax/overrides/:id — Delete one override.
async fn delete_override(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let override_id = OverrideId::from(id);

    let existing = state
        .overrides
        .get(override_id)
        .ok_or_else(|| AppError::NotFound(format!("override {override_id} not found")))?;
    require_store_access(&caller, existing.store_id)?;

    state.overrides.delete(override_id)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::overrides::delete(pool, override_id).await {
            tracing::error!(override_id = %override_id, error = %e, "failed to persist tax override deletion");
            return Err(AppError::Internal(
                "override deleted in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/tax/overrides/store/:store_id/country/:country_id — List a
/// tenant's overrides for a country.
async fn list_overrides(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((store_id, country_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<OverrideQueryParams>,
) -> Result<Json<Vec<OverrideResponse>>, AppError> {
    let store = StoreId::from(store_id);
    require_store_access(&caller, store)?;

    let country = CountryId::from(country_id);
    state.catalog.get_country(country)?;

    let rows = state
        .overrides
        .list(store, country, params.state_id.map(StateId::from));
    Ok(Json(rows.iter().map(OverrideResponse::from).collect()))
}

/// DELETE /v1/tax/overrides/store/:store_id/country/:country_id — Remove
/// every override the tenant holds for the country, reverting it to
/// platform defaults.
async fn bulk_delete_overrides(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((store_id, country_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    let store = StoreId::from(store_id);
    require_store_access(&caller, store)?;

    let country = CountryId::from(country_id);
    state.catalog.get_country(country)?;

    let deleted = state.overrides.delete_all(store, country);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::overrides::delete_all(pool, store, country).await {
            tracing::error!(store_id = %store, country_id = %country, error = %e,
                "failed to persist bulk tax override deletion");
            return Err(AppError::Internal(
                "overrides deleted in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(BulkDeleteResponse { deleted }))
}

/// Validate an optional state reference: it must exist and belong to the
/// given country.
fn validate_state_ref(
    state: &AppState,
    country_id: CountryId,
    raw: Option<Uuid>,
) -> Result<Option<StateId>, AppError> {
    match raw {
        None => Ok(None),
        Some(raw) => {
            let sid = StateId::from(raw);
            let catalog_state = state.catalog.get_state(sid)?;
            if catalog_state.country_id != country_id {
                return Err(AppError::Validation(format!(
                    "state {sid} does not belong to country {country_id}"
                )));
            }
            Ok(Some(sid))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
