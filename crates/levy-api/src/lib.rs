//! # levy-api — Axum API Services for the Levy Tax Platform
//!
//! HTTP surface over the tax rate resolution core: jurisdiction catalog
//! queries, platform default administration, tenant override management,
//! and the resolved effective-rate view consumed by pricing and the admin
//! UI.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                   | Domain                 |
//! |-------------------------|--------------------------|------------------------|
//! | `/v1/catalog/*`         | [`routes::catalog`]      | Jurisdiction catalog   |
//! | `/v1/tax/defaults/*`    | [`routes::defaults`]     | Platform baselines     |
//! | `/v1/tax/overrides/*`   | [`routes::overrides`]    | Tenant overrides       |
//! | `/v1/tax/effective-rate/*` | [`routes::resolution`] | Resolved rates        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`) are mounted outside the auth middleware so
//! they remain accessible without credentials.

pub mod auth;
pub mod bootstrap;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::defaults::router())
        .merge(routes::overrides::router())
        .merge(routes::resolution::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
