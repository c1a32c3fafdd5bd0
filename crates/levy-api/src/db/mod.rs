//! # Database Layer
//!
//! Optional Postgres persistence behind the in-memory registries. All
//! functions take a `&PgPool`; the service runs fully in-memory when
//! `DATABASE_URL` is unset.
//!
//! The override table carries the correctness-critical unique index on
//! `(store_id, country_id, state_id)` — federal rows store a NULL
//! `state_id`, which Postgres unique indexes treat as distinct values, so
//! the index coalesces NULL to the nil UUID to enforce one federal row
//! per key.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod catalog;
pub mod defaults;
pub mod overrides;

/// Initialize the connection pool from `DATABASE_URL` and ensure the
/// schema exists.
///
/// Returns `Ok(None)` when `DATABASE_URL` is unset — the service then
/// operates in-memory only.
///
/// # Errors
///
/// Returns the underlying error when the pool cannot connect or the
/// schema statements fail.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        tracing::info!("DATABASE_URL not set — running with in-memory stores only");
        return Ok(None);
    };

    let pool = PgPoolOptions::new().max_connections(5).connect(&url).await?;
    ensure_schema(&pool).await?;
    tracing::info!("database pool initialized");
    Ok(Some(pool))
}

/// Create tables and indexes if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS countries (
            id UUID PRIMARY KEY,
            iso2 TEXT NOT NULL,
            iso3 TEXT NOT NULL,
            numeric_code INT NOT NULL,
            name TEXT NOT NULL,
            region TEXT,
            currency_code TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS states (
            id UUID PRIMARY KEY,
            country_id UUID NOT NULL REFERENCES countries (id),
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            country_iso2 TEXT NOT NULL,
            kind TEXT NOT NULL,
            UNIQUE (country_id, code)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tax_defaults (
            country_id UUID NOT NULL REFERENCES countries (id),
            state_id UUID REFERENCES states (id),
            tax_label TEXT NOT NULL,
            tax_rate_centi BIGINT NOT NULL,
            calculation_method TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS tax_defaults_scope_key
         ON tax_defaults (country_id, COALESCE(state_id, '00000000-0000-0000-0000-000000000000'::uuid))",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tax_overrides (
            id UUID PRIMARY KEY,
            store_id UUID NOT NULL,
            country_id UUID NOT NULL REFERENCES countries (id),
            state_id UUID REFERENCES states (id),
            tax_label TEXT NOT NULL,
            tax_rate_centi BIGINT NOT NULL,
            calculation_method TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS tax_overrides_scope_key
         ON tax_overrides (store_id, country_id, COALESCE(state_id, '00000000-0000-0000-0000-000000000000'::uuid))",
    )
    .execute(pool)
    .await?;

    Ok(())
}
