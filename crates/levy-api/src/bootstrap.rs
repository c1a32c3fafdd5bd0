//! # Service Bootstrap
//!
//! Assembles application state at startup:
//!
//! 1. **Seed** — the reference catalog and the platform baseline rules are
//!    loaded from code. The Default Policy Registry is the single source
//!    of baseline truth; no resolution path special-cases a country.
//! 2. **Hydrate** — when a database pool is present, persisted catalog
//!    rows, default rules, and tenant overrides are loaded over the seed
//!    (database rows win).
//! 3. **Banner** — a structured startup log line with store counts.

use sqlx::PgPool;
use thiserror::Error;

use crate::state::{AppConfig, AppState};

/// Errors during service bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Hydration from the database failed.
    #[error("database hydration failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Build the application state: seed, hydrate, and log the banner.
///
/// # Errors
///
/// [`BootstrapError::Database`] when hydration queries fail. Individual
/// rows that fail domain validation are logged and skipped instead.
pub async fn bootstrap(
    config: AppConfig,
    db_pool: Option<PgPool>,
) -> Result<AppState, BootstrapError> {
    let state = AppState::with_config(config, db_pool);

    state.hydrate_from_db().await?;

    tracing::info!(
        countries = state.catalog.country_count(),
        states = state.catalog.state_count(),
        default_rules = state.defaults.len(),
        overrides = state.overrides.len(),
        auth = state.config.auth_token.is_some(),
        persistence = state.db_pool.is_some(),
        "levy tax service bootstrapped"
    );

    Ok(state)
}
