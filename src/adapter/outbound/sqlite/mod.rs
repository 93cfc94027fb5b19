//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`EntityStore`](crate::port::outbound::store::EntityStore)
//! and the opener the router uses to build one store per universe.

pub mod database;
pub mod opener;
pub mod store;
