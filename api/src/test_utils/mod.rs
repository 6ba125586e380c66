//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The mocks are plain in-memory repositories. `AppState` is wired to the
//! Postgres adapters, so business flows are tested at the service layer.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
