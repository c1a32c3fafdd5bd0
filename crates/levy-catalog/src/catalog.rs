//! # Jurisdiction Catalog Store
//!
//! Thread-safe in-memory store for country and state reference data.
//!
//! All operations are synchronous (the lock is `parking_lot`, not
//! `tokio::sync`) because the lock is never held across `.await` points.
//! Lookups clone the record out so no guard escapes this module.

use std::collections::HashMap;

use levy_core::{CountryId, StateId};
use parking_lot::RwLock;
use thiserror::Error;

use crate::model::{Country, State};

/// Errors from catalog operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The country id does not resolve.
    #[error("country {0} not found")]
    CountryNotFound(CountryId),

    /// The state id does not resolve.
    #[error("state {0} not found")]
    StateNotFound(StateId),

    /// A state with the same `(country_id, code)` already exists.
    #[error("state code \"{code}\" already exists for country {country_id}")]
    DuplicateStateCode {
        /// The owning country.
        country_id: CountryId,
        /// The conflicting subdivision code.
        code: String,
    },
}

#[derive(Debug, Default)]
struct Inner {
    countries: HashMap<CountryId, Country>,
    states: HashMap<StateId, State>,
    /// States per country, for listing without a full scan.
    by_country: HashMap<CountryId, Vec<StateId>>,
}

/// Thread-safe catalog of countries and states.
#[derive(Debug, Default)]
pub struct JurisdictionCatalog {
    inner: RwLock<Inner>,
}

impl JurisdictionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a country.
    ///
    /// Replacement keeps existing states attached; the ingestion process
    /// updates country metadata in place without re-importing states.
    pub fn upsert_country(&self, country: Country) {
        let mut inner = self.inner.write();
        inner.by_country.entry(country.id).or_default();
        inner.countries.insert(country.id, country);
    }

    /// Insert a state under its owning country.
    ///
    /// The state's `country_iso2` is overwritten from the owning country
    /// record to keep the denormalized field consistent.
    ///
    /// # Errors
    ///
    /// [`CatalogError::CountryNotFound`] when the owning country is absent,
    /// [`CatalogError::DuplicateStateCode`] when `(country_id, code)` is
    /// already taken by a different state id.
    pub fn insert_state(&self, mut state: State) -> Result<(), CatalogError> {
        let mut inner = self.inner.write();

        let iso2 = inner
            .countries
            .get(&state.country_id)
            .map(|c| c.iso2.clone())
            .ok_or(CatalogError::CountryNotFound(state.country_id))?;

        let duplicate = inner
            .by_country
            .get(&state.country_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.states.get(id))
            .any(|existing| existing.code == state.code && existing.id != state.id);
        if duplicate {
            return Err(CatalogError::DuplicateStateCode {
                country_id: state.country_id,
                code: state.code,
            });
        }

        state.country_iso2 = iso2;
        let country_id = state.country_id;
        let state_id = state.id;
        let replaced = inner.states.insert(state_id, state).is_some();
        if !replaced {
            inner.by_country.entry(country_id).or_default().push(state_id);
        }
        Ok(())
    }

    /// Fetch a country by id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::CountryNotFound`] when the id does not resolve.
    pub fn get_country(&self, id: CountryId) -> Result<Country, CatalogError> {
        self.inner
            .read()
            .countries
            .get(&id)
            .cloned()
            .ok_or(CatalogError::CountryNotFound(id))
    }

    /// Fetch a state by id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::StateNotFound`] when the id does not resolve.
    pub fn get_state(&self, id: StateId) -> Result<State, CatalogError> {
        self.inner
            .read()
            .states
            .get(&id)
            .cloned()
            .ok_or(CatalogError::StateNotFound(id))
    }

    /// List all countries, name-ascending.
    pub fn list_countries(&self) -> Vec<Country> {
        let inner = self.inner.read();
        let mut countries: Vec<Country> = inner.countries.values().cloned().collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }

    /// List a country's states, name-ascending.
    ///
    /// Defines the output set of a resolution: every state of the country
    /// appears, whether or not any tax rule exists for it.
    ///
    /// # Errors
    ///
    /// [`CatalogError::CountryNotFound`] when the country id does not
    /// resolve.
    pub fn list_states(&self, country_id: CountryId) -> Result<Vec<State>, CatalogError> {
        let inner = self.inner.read();
        if !inner.countries.contains_key(&country_id) {
            return Err(CatalogError::CountryNotFound(country_id));
        }
        let mut states: Vec<State> = inner
            .by_country
            .get(&country_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.states.get(id))
            .cloned()
            .collect();
        states.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(states)
    }

    /// Number of countries in the catalog.
    pub fn country_count(&self) -> usize {
        self.inner.read().countries.len()
    }

    /// Number of states in the catalog.
    pub fn state_count(&self) -> usize {
        self.inner.read().states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, iso2: &str, iso3: &str) -> Country {
        Country::new(CountryId::new(), iso2, iso3, 1, name).unwrap()
    }

    fn state(country: &Country, code: &str, name: &str) -> State {
        // country_iso2 deliberately wrong: insert_state must fix it.
        State::new(StateId::new(), country.id, code, name, "XX", "state").unwrap()
    }

    #[test]
    fn get_country_roundtrip() {
        let catalog = JurisdictionCatalog::new();
        let india = country("India", "IN", "IND");
        catalog.upsert_country(india.clone());
        assert_eq!(catalog.get_country(india.id).unwrap().name, "India");
    }

    #[test]
    fn get_country_not_found() {
        let catalog = JurisdictionCatalog::new();
        let missing = CountryId::new();
        assert_eq!(
            catalog.get_country(missing),
            Err(CatalogError::CountryNotFound(missing))
        );
    }

    #[test]
    fn insert_state_requires_country() {
        let catalog = JurisdictionCatalog::new();
        let orphan = State::new(StateId::new(), CountryId::new(), "MH", "Maharashtra", "IN", "state")
            .unwrap();
        assert!(matches!(
            catalog.insert_state(orphan),
            Err(CatalogError::CountryNotFound(_))
        ));
    }

    #[test]
    fn insert_state_fixes_denormalized_iso2() {
        let catalog = JurisdictionCatalog::new();
        let india = country("India", "IN", "IND");
        catalog.upsert_country(india.clone());
        let mh = state(&india, "MH", "Maharashtra");
        let id = mh.id;
        catalog.insert_state(mh).unwrap();
        assert_eq!(catalog.get_state(id).unwrap().country_iso2, "IN");
    }

    #[test]
    fn duplicate_state_code_rejected() {
        let catalog = JurisdictionCatalog::new();
        let india = country("India", "IN", "IND");
        catalog.upsert_country(india.clone());
        catalog.insert_state(state(&india, "MH", "Maharashtra")).unwrap();
        let dup = state(&india, "MH", "Maharashtra Again");
        assert!(matches!(
            catalog.insert_state(dup),
            Err(CatalogError::DuplicateStateCode { .. })
        ));
    }

    #[test]
    fn same_code_allowed_across_countries() {
        let catalog = JurisdictionCatalog::new();
        let us = country("United States", "US", "USA");
        let ca = country("Canada", "CA", "CAN");
        catalog.upsert_country(us.clone());
        catalog.upsert_country(ca.clone());
        catalog.insert_state(state(&us, "ON", "Oneida")).unwrap();
        catalog.insert_state(state(&ca, "ON", "Ontario")).unwrap();
        assert_eq!(catalog.state_count(), 2);
    }

    #[test]
    fn reinsert_same_state_id_updates_in_place() {
        let catalog = JurisdictionCatalog::new();
        let india = country("India", "IN", "IND");
        catalog.upsert_country(india.clone());
        let mut mh = state(&india, "MH", "Maharastra");
        let id = mh.id;
        catalog.insert_state(mh.clone()).unwrap();
        mh.name = "Maharashtra".to_string();
        catalog.insert_state(mh).unwrap();
        assert_eq!(catalog.get_state(id).unwrap().name, "Maharashtra");
        assert_eq!(catalog.list_states(india.id).unwrap().len(), 1);
    }

    #[test]
    fn list_states_name_ascending() {
        let catalog = JurisdictionCatalog::new();
        let india = country("India", "IN", "IND");
        catalog.upsert_country(india.clone());
        catalog.insert_state(state(&india, "TN", "Tamil Nadu")).unwrap();
        catalog.insert_state(state(&india, "KA", "Karnataka")).unwrap();
        catalog.insert_state(state(&india, "MH", "Maharashtra")).unwrap();

        let names: Vec<String> = catalog
            .list_states(india.id)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Karnataka", "Maharashtra", "Tamil Nadu"]);
    }

    #[test]
    fn list_states_unknown_country() {
        let catalog = JurisdictionCatalog::new();
        assert!(catalog.list_states(CountryId::new()).is_err());
    }

    #[test]
    fn list_states_empty_country() {
        let catalog = JurisdictionCatalog::new();
        let mc = country("Monaco", "MC", "MCO");
        catalog.upsert_country(mc.clone());
        assert!(catalog.list_states(mc.id).unwrap().is_empty());
    }

    #[test]
    fn list_countries_name_ascending() {
        let catalog = JurisdictionCatalog::new();
        catalog.upsert_country(country("India", "IN", "IND"));
        catalog.upsert_country(country("Canada", "CA", "CAN"));
        let names: Vec<String> = catalog.list_countries().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Canada", "India"]);
    }
}
