//! Tenant tax override persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tax_overrides`
//! table. The `tax_overrides_scope_key` unique index is the cross-process
//! tiebreaker for concurrent creates on the same
//! `(store_id, country_id, state_id)` key.

use chrono::{DateTime, Utc};
use levy_core::{CalculationMethod, CountryId, OverrideId, RatePercent, StateId, StoreId};
use levy_policy::TenantTaxOverride;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new override row.
pub async fn insert(pool: &PgPool, row: &TenantTaxOverride) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tax_overrides (id, store_id, country_id, state_id, tax_label,
         tax_rate_centi, calculation_method, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(row.id.as_uuid())
    .bind(row.store_id.as_uuid())
    .bind(row.country_id.as_uuid())
    .bind(row.state_id.map(|s| *s.as_uuid()))
    .bind(&row.tax_label)
    .bind(row.tax_rate.as_centi())
    .bind(row.calculation_method.map(|m| m.as_str()))
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update the mutable fields of an override row.
pub async fn update(pool: &PgPool, row: &TenantTaxOverride) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE tax_overrides
         SET tax_label = $2, tax_rate_centi = $3, calculation_method = $4, updated_at = $5
         WHERE id = $1",
    )
    .bind(row.id.as_uuid())
    .bind(&row.tax_label)
    .bind(row.tax_rate.as_centi())
    .bind(row.calculation_method.map(|m| m.as_str()))
    .bind(row.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete one override row.
pub async fn delete(pool: &PgPool, id: OverrideId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tax_overrides WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every override a tenant holds for a country. Returns the number
/// of rows removed.
pub async fn delete_all(
    pool: &PgPool,
    store_id: StoreId,
    country_id: CountryId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tax_overrides WHERE store_id = $1 AND country_id = $2")
        .bind(store_id.as_uuid())
        .bind(country_id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Load all overrides for startup hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<TenantTaxOverride>, sqlx::Error> {
    let rows = sqlx::query_as::<_, OverrideRow>(
        "SELECT id, store_id, country_id, state_id, tax_label, tax_rate_centi,
         calculation_method, created_at, updated_at
         FROM tax_overrides ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(OverrideRow::into_record).collect())
}

/// Whether a database error is the unique-index violation raised by
/// concurrent creates on the same scope key.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct OverrideRow {
    id: Uuid,
    store_id: Uuid,
    country_id: Uuid,
    state_id: Option<Uuid>,
    tax_label: String,
    tax_rate_centi: i64,
    calculation_method: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OverrideRow {
    /// Convert a row into the domain record, dropping rows whose stored
    /// rate or method no longer passes domain validation.
    fn into_record(self) -> Option<TenantTaxOverride> {
        let tax_rate = match RatePercent::from_centi(self.tax_rate_centi) {
            Ok(rate) => rate,
            Err(err) => {
                tracing::error!(
                    override_id = %self.id,
                    error = %err,
                    "tax_overrides row carries an out-of-range rate — skipping"
                );
                return None;
            }
        };
        let calculation_method = match self.calculation_method {
            None => None,
            Some(raw) => match raw.parse::<CalculationMethod>() {
                Ok(method) => Some(method),
                Err(err) => {
                    tracing::error!(
                        override_id = %self.id,
                        error = %err,
                        "tax_overrides row carries an unknown calculation method — skipping"
                    );
                    return None;
                }
            },
        };

        Some(TenantTaxOverride {
            id: OverrideId::from(self.id),
            store_id: StoreId::from(self.store_id),
            country_id: CountryId::from(self.country_id),
            state_id: self.state_id.map(StateId::from),
            tax_label: self.tax_label,
            tax_rate,
            calculation_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
