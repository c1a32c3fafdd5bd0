//! # Reference Catalog Seed
//!
//! A seeded jurisdiction dataset covering the launch markets. In production
//! deployments the bulk ingestion process replaces this with the full ISO
//! dataset; the identifiers here are fixed so that database rows written
//! against the seed survive process restarts.

use levy_core::{CountryId, StateId};
use uuid::Uuid;

use crate::catalog::JurisdictionCatalog;
use crate::model::{Country, State};

/// India.
pub const INDIA: CountryId = CountryId::from_uuid(Uuid::from_u128(0x6a1f_0000_0000_4000_8000_0000_0000_0356));
/// United States.
pub const UNITED_STATES: CountryId =
    CountryId::from_uuid(Uuid::from_u128(0x6a1f_0000_0000_4000_8000_0000_0000_0840));
/// Canada.
pub const CANADA: CountryId =
    CountryId::from_uuid(Uuid::from_u128(0x6a1f_0000_0000_4000_8000_0000_0000_0124));

/// Maharashtra, India.
pub const MAHARASHTRA: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0001_0000_4000_8000_0000_0000_0001));
/// Karnataka, India.
pub const KARNATAKA: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0001_0000_4000_8000_0000_0000_0002));
/// Tamil Nadu, India.
pub const TAMIL_NADU: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0001_0000_4000_8000_0000_0000_0003));
/// California, United States.
pub const CALIFORNIA: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0002_0000_4000_8000_0000_0000_0001));
/// New York, United States.
pub const NEW_YORK: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0002_0000_4000_8000_0000_0000_0002));
/// Texas, United States.
pub const TEXAS: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0002_0000_4000_8000_0000_0000_0003));
/// Ontario, Canada.
pub const ONTARIO: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0003_0000_4000_8000_0000_0000_0001));
/// Quebec, Canada.
pub const QUEBEC: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0003_0000_4000_8000_0000_0000_0002));
/// British Columbia, Canada.
pub const BRITISH_COLUMBIA: StateId =
    StateId::from_uuid(Uuid::from_u128(0x6a1f_0003_0000_4000_8000_0000_0000_0003));

/// Build a catalog pre-loaded with the reference dataset.
pub fn reference_catalog() -> JurisdictionCatalog {
    let catalog = JurisdictionCatalog::new();

    let countries = [
        (INDIA, "IN", "IND", 356u16, "India", "Asia", "INR"),
        (UNITED_STATES, "US", "USA", 840, "United States", "Americas", "USD"),
        (CANADA, "CA", "CAN", 124, "Canada", "Americas", "CAD"),
    ];
    for (id, iso2, iso3, numeric_code, name, region, currency) in countries {
        catalog.upsert_country(Country {
            id,
            iso2: iso2.into(),
            iso3: iso3.into(),
            numeric_code,
            name: name.into(),
            region: Some(region.into()),
            currency_code: Some(currency.into()),
        });
    }

    let states = [
        (MAHARASHTRA, INDIA, "MH", "Maharashtra", "state"),
        (KARNATAKA, INDIA, "KA", "Karnataka", "state"),
        (TAMIL_NADU, INDIA, "TN", "Tamil Nadu", "state"),
        (CALIFORNIA, UNITED_STATES, "CA", "California", "state"),
        (NEW_YORK, UNITED_STATES, "NY", "New York", "state"),
        (TEXAS, UNITED_STATES, "TX", "Texas", "state"),
        (ONTARIO, CANADA, "ON", "Ontario", "province"),
        (QUEBEC, CANADA, "QC", "Quebec", "province"),
        (BRITISH_COLUMBIA, CANADA, "BC", "British Columbia", "province"),
    ];
    for (id, country_id, code, name, kind) in states {
        let state = State {
            id,
            country_id,
            code: code.into(),
            name: name.into(),
            // Filled in by the catalog from the owning country.
            country_iso2: String::new(),
            kind: kind.into(),
        };
        if let Err(err) = catalog.insert_state(state) {
            unreachable!("seed dataset is internally consistent: {err}");
        }
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_loads() {
        let catalog = reference_catalog();
        assert_eq!(catalog.country_count(), 3);
        assert_eq!(catalog.state_count(), 9);
    }

    #[test]
    fn seed_states_are_attached() {
        let catalog = reference_catalog();
        let india_states = catalog.list_states(INDIA).unwrap();
        assert_eq!(india_states.len(), 3);
        assert!(india_states.iter().all(|s| s.country_iso2 == "IN"));
    }

    #[test]
    fn seed_ids_are_stable() {
        // The constants are the contract for database persistence.
        let a = reference_catalog();
        let b = reference_catalog();
        assert_eq!(
            a.get_state(MAHARASHTRA).unwrap(),
            b.get_state(MAHARASHTRA).unwrap()
        );
    }

    #[test]
    fn seed_ordering_by_name() {
        let catalog = reference_catalog();
        let names: Vec<String> = catalog
            .list_states(CANADA)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["British Columbia", "Ontario", "Quebec"]);
    }
}
