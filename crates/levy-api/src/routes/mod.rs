//! # Route Modules
//!
//! One module per API domain:
//!
//! - [`catalog`] — jurisdiction reference data queries
//! - [`defaults`] — platform baseline administration and effective-default views
//! - [`overrides`] — tenant override management
//! - [`resolution`] — the resolved tax view and effective-rate queries

pub mod catalog;
pub mod defaults;
pub mod overrides;
pub mod resolution;
