//! Cross-crate integration tests for the Levy tax platform.
//!
//! This crate carries no library code — see the `tests/` directory.
