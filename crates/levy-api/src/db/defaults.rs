//! Default tax rule persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tax_defaults` table.
//! The table is keyed by scope, not by a surrogate id, matching the
//! registry's upsert semantics.

use levy_core::{CalculationMethod, CountryId, RatePercent, StateId};
use levy_policy::DefaultTaxRule;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert or replace the rule at its `(country_id, state_id)` scope.
///
/// The arbiter expression matches the `tax_defaults_scope_key` unique
/// index, coalescing the federal NULL to the nil UUID.
pub async fn upsert(pool: &PgPool, rule: &DefaultTaxRule) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tax_defaults (country_id, state_id, tax_label, tax_rate_centi, calculation_method)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (country_id, COALESCE(state_id, '00000000-0000-0000-0000-000000000000'::uuid))
         DO UPDATE SET tax_label = $3, tax_rate_centi = $4, calculation_method = $5",
    )
    .bind(rule.country_id.as_uuid())
    .bind(rule.state_id.map(|s| *s.as_uuid()))
    .bind(&rule.tax_label)
    .bind(rule.tax_rate.as_centi())
    .bind(rule.calculation_method.map(|m| m.as_str()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all default tax rules for startup hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<DefaultTaxRule>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DefaultRow>(
        "SELECT country_id, state_id, tax_label, tax_rate_centi, calculation_method
         FROM tax_defaults",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(DefaultRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DefaultRow {
    country_id: Uuid,
    state_id: Option<Uuid>,
    tax_label: String,
    tax_rate_centi: i64,
    calculation_method: Option<String>,
}

impl DefaultRow {
    /// Convert a row into the domain record, dropping rows whose stored
    /// rate or method no longer passes domain validation. A dropped row is
    /// logged; it indicates out-of-band database edits.
    fn into_record(self) -> Option<DefaultTaxRule> {
        let tax_rate = match RatePercent::from_centi(self.tax_rate_centi) {
            Ok(rate) => rate,
            Err(err) => {
                tracing::error!(
                    tax_rate_centi = self.tax_rate_centi,
                    error = %err,
                    "tax_defaults row carries an out-of-range rate — skipping"
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
                        method = %raw,
                        error = %err,
                        "tax_defaults row carries an unknown calculation method — skipping"
                    );
                    return None;
                }
            },
        };

        Some(DefaultTaxRule {
            country_id: CountryId::from(self.country_id),
            state_id: self.state_id.map(StateId::from),
            tax_label: self.tax_label,
            tax_rate,
            calculation_method,
        })
    }
}
