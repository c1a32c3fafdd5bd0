//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! ## Architecture
//!
//! `AppState` holds the three shared tax-core handles — the jurisdiction
//! catalog, the default policy registry, and the tenant override registry —
//! plus the resolution engine over them and an optional Postgres pool.
//!
//! The in-memory registries are the primary store; when a pool is present,
//! every mutation is written through to Postgres and the registries are
//! hydrated from it at startup. The registries' own locks are
//! `parking_lot` (never held across `.await`), so all handler-side
//! registry calls are synchronous.

use std::sync::Arc;

use levy_catalog::{seed as catalog_seed, Country, JurisdictionCatalog, State as CatalogState};
use levy_policy::{DefaultPolicyRegistry, OverrideRegistry, ResolutionEngine};
use sqlx::PgPool;

/// Server configuration assembled from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Expected bearer secret; `None` disables authentication (dev mode).
    pub auth_token: Option<String>,
}

impl AppConfig {
    /// Build configuration from `PORT` and `AUTH_TOKEN` environment
    /// variables, with a default port of 8080.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let auth_token = std::env::var("AUTH_TOKEN").ok();
        Self { port, auth_token }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Shared application state. Cheap to clone: everything is behind `Arc`
/// or is a pooled handle.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: AppConfig,
    /// Jurisdiction reference data.
    pub catalog: Arc<JurisdictionCatalog>,
    /// Platform baseline tax rules.
    pub defaults: Arc<DefaultPolicyRegistry>,
    /// Tenant tax overrides.
    pub overrides: Arc<OverrideRegistry>,
    /// Resolution over the three stores above.
    pub engine: ResolutionEngine,
    /// Optional Postgres pool for write-through persistence.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Create state with the seeded reference catalog and platform
    /// baseline, no database. This is the configuration used by tests.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create state with explicit configuration and an optional pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let catalog = Arc::new(catalog_seed::reference_catalog());
        let defaults = Arc::new(DefaultPolicyRegistry::with_platform_baseline());
        let overrides = Arc::new(OverrideRegistry::new());
        let engine = ResolutionEngine::new(
            Arc::clone(&catalog),
            Arc::clone(&defaults),
            Arc::clone(&overrides),
        );
        Self {
            config,
            catalog,
            defaults,
            overrides,
            engine,
            db_pool,
        }
    }

    /// Hydrate the in-memory stores from the database, when connected.
    ///
    /// Database rows win over the code seed (defaults are upserted over
    /// it). Rows that fail domain validation are logged and skipped — a
    /// corrupt row must not take the whole service down with it, and the
    /// invariant check in the resolution path still fails loudly if one
    /// slips through a scope it governs.
    ///
    /// # Errors
    ///
    /// Returns the first database error encountered. Validation failures
    /// of individual rows are not errors at this level.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };

        let countries: Vec<Country> = crate::db::catalog::load_countries(pool).await?;
        let country_count = countries.len();
        for country in countries {
            self.catalog.upsert_country(country);
        }

        let states: Vec<CatalogState> = crate::db::catalog::load_states(pool).await?;
        let state_count = states.len();
        for state in states {
            if let Err(err) = self.catalog.insert_state(state) {
                tracing::warn!(error = %err, "skipping catalog state row during hydration");
            }
        }

        let default_rules = crate::db::defaults::load_all(pool).await?;
        let default_count = default_rules.len();
        for rule in default_rules {
            if let Err(err) = self.defaults.upsert(rule) {
                tracing::warn!(error = %err, "skipping default tax rule row during hydration");
            }
        }

        let override_rows = crate::db::overrides::load_all(pool).await?;
        let override_count = override_rows.len();
        for row in override_rows {
            if let Err(err) = self.overrides.insert_existing(row) {
                tracing::warn!(error = %err, "skipping tax override row during hydration");
            }
        }

        tracing::info!(
            countries = country_count,
            states = state_count,
            defaults = default_count,
            overrides = override_count,
            "hydrated tax stores from database"
        );
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
