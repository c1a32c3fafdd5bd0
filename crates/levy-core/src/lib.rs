#![deny(missing_docs)]

//! # levy-core — Foundational Types for the Levy Tax Platform
//!
//! This crate defines the foundational types that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`StoreId`] where a [`CountryId`] is
//!    expected.
//!
//! 2. **No floats in policy math.** Tax rates are fixed-point integers in
//!    hundredths of a percent ([`RatePercent`], [`EffectiveRate`]), parsed
//!    from and formatted to decimal strings. A rate that cannot be
//!    represented exactly at that precision is rejected, not truncated.
//!
//! 3. **Single [`CalculationMethod`] enum.** One definition, three variants,
//!    exhaustive `match` everywhere. No stringly-typed method values past
//!    the API boundary.
//!
//! 4. **[`ValidationError`] hierarchy.** Structured errors with `thiserror` —
//!    no `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod method;
pub mod rate;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use identity::{CountryId, OverrideId, StateId, StoreId};
pub use method::CalculationMethod;
pub use rate::{EffectiveRate, RatePercent};
