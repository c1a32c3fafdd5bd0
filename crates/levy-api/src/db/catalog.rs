//! Catalog persistence operations.
//!
//! Countries and states are owned by the external ingestion process; this
//! module only loads them for hydration and mirrors them when the seed is
//! extended at runtime through defaults administration. Rows are read in
//! insertion-safe order (countries before states).

use levy_catalog::{Country, State};
use levy_core::{CountryId, StateId};
use sqlx::PgPool;
use uuid::Uuid;

/// Load all countries.
pub async fn load_countries(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CountryRow>(
        "SELECT id, iso2, iso3, numeric_code, name, region, currency_code
         FROM countries ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CountryRow::into_record).collect())
}

/// Load all states.
pub async fn load_states(pool: &PgPool) -> Result<Vec<State>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StateRow>(
        "SELECT id, country_id, code, name, country_iso2, kind
         FROM states ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(StateRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    iso2: String,
    iso3: String,
    numeric_code: i32,
    name: String,
    region: Option<String>,
    currency_code: Option<String>,
}

impl CountryRow {
    fn into_record(self) -> Country {
        Country {
            id: CountryId::from(self.id),
            iso2: self.iso2,
            iso3: self.iso3,
            numeric_code: u16::try_from(self.numeric_code).unwrap_or_else(|_| {
                tracing::error!(
                    numeric_code = self.numeric_code,
                    "country numeric_code out of u16 range in database — defaulting to 0"
                );
                0
            }),
            name: self.name,
            region: self.region,
            currency_code: self.currency_code,
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct StateRow {
    id: Uuid,
    country_id: Uuid,
    code: String,
    name: String,
    country_iso2: String,
    kind: String,
}

impl StateRow {
    fn into_record(self) -> State {
        State {
            id: StateId::from(self.id),
            country_id: CountryId::from(self.country_id),
            code: self.code,
            name: self.name,
            country_iso2: self.country_iso2,
            kind: self.kind,
        }
    }
}
