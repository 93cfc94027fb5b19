//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for definitions, wallets, flows, orders and positions.
//! - [`universe`] - [`TestUniverse`](universe::TestUniverse): two memory
//!   stores behind an initialized router, with lookup counters.

pub mod domain;
pub mod universe;
