//! # OpenAPI Specification Assembly
//!
//! Assembles the documented component schemas into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the tax API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Levy Tax API",
        version = "0.1.0",
        description = "Tax rate resolution for the Levy commerce platform: jurisdiction catalog, platform default administration, tenant overrides, and the resolved effective-rate view.",
        license(name = "AGPL-3.0-or-later")
    ),
    components(schemas(
        // Catalog DTOs
        crate::routes::catalog::CountryResponse,
        crate::routes::catalog::StateResponse,
        // Defaults DTOs
        crate::routes::defaults::UpsertDefaultRequest,
        crate::routes::defaults::DefaultRuleResponse,
        crate::routes::defaults::EffectiveDefaultEntry,
        // Override DTOs
        crate::routes::overrides::CreateOverrideRequest,
        crate::routes::overrides::UpdateOverrideRequest,
        crate::routes::overrides::OverrideResponse,
        crate::routes::overrides::BulkDeleteResponse,
        // Resolution DTOs
        crate::routes::resolution::EffectiveTaxDto,
        crate::routes::resolution::ResolvedStateDto,
        crate::routes::resolution::ResolvedCountryResponse,
        crate::routes::resolution::EffectiveRateResponse,
        // Auth & error types
        crate::auth::Role,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    ))
)]
pub struct ApiDoc;

/// Construct the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

/// GET /openapi.json — The assembled OpenAPI document.
async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
