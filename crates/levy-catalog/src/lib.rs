#![deny(missing_docs)]

//! # levy-catalog — Jurisdiction Reference Data
//!
//! Countries and their subordinate states/provinces. This is the leaf
//! dependency of the tax subsystem: both policy registries and the
//! resolution engine address jurisdictions exclusively through catalog
//! identifiers, and a resolution's output set is *defined* by the catalog
//! (every state of a country appears in the resolved view, whether or not
//! any tax rule exists for it).
//!
//! Catalog rows are owned by an external bulk ingestion process; inside
//! this workspace they are written only by seeding
//! ([`seed::reference_catalog`]) and database hydration. From the
//! resolution engine's perspective the catalog is read-only.

pub mod catalog;
pub mod model;
pub mod seed;

pub use catalog::{CatalogError, JurisdictionCatalog};
pub use model::{Country, State};
