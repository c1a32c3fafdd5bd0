//! # Jurisdiction Catalog API
//!
//! Read-only HTTP surface over the jurisdiction catalog:
//!
//! - **GET `/v1/catalog/countries`** — list countries
//! - **GET `/v1/catalog/countries/:id`** — get one country
//! - **GET `/v1/catalog/countries/:id/states`** — list a country's states
//!
//! Catalog rows are owned by the external ingestion process; there is no
//! write surface here.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use levy_catalog::{Country, State as CatalogState};
use levy_core::CountryId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Country as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountryResponse {
    pub id: Uuid,
    pub iso2: String,
    pub iso3: String,
    pub numeric_code: u16,
    pub name: String,
    pub region: Option<String>,
    pub currency_code: Option<String>,
}

impl From<Country> for CountryResponse {
    fn from(c: Country) -> Self {
        Self {
            id: *c.id.as_uuid(),
            iso2: c.iso2,
            iso3: c.iso3,
            numeric_code: c.numeric_code,
            name: c.name,
            region: c.region,
            currency_code: c.currency_code,
        }
    }
}

/// State as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StateResponse {
    pub id: Uuid,
    pub country_id: Uuid,
    pub code: String,
    pub name: String,
    pub country_iso2: String,
    pub kind: String,
}

impl From<CatalogState> for StateResponse {
    fn from(s: CatalogState) -> Self {
        Self {
            id: *s.id.as_uuid(),
            country_id: *s.country_id.as_uuid(),
            code: s.code,
            name: s.name,
            country_iso2: s.country_iso2,
            kind: s.kind,
        }
    }
}

/// Construct the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog/countries", get(list_countries))
        .route("/v1/catalog/countries/{id}", get(get_country))
        .route("/v1/catalog/countries/{id}/states", get(list_states))
}

/// GET /v1/catalog/countries — List countries, name-ascending.
async fn list_countries(State(state): State<AppState>) -> Json<Vec<CountryResponse>> {
    let countries = state
        .catalog
        .list_countries()
        .into_iter()
        .map(CountryResponse::from)
        .collect();
    Json(countries)
}

/// GET /v1/catalog/countries/:id — Get a country by id.
async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CountryResponse>, AppError> {
    let country = state.catalog.get_country(CountryId::from(id))?;
    Ok(Json(country.into()))
}

/// GET /v1/catalog/countries/:id/states — List a country's states,
/// name-ascending.
async fn list_states(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StateResponse>>, AppError> {
    let states = state
        .catalog
        .list_states(CountryId::from(id))?
        .into_iter()
        .map(StateResponse::from)
        .collect();
    Ok(Json(states))
}
