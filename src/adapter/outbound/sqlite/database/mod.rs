//! SQLite plumbing: pooled connections, embedded migrations and the
//! Diesel schema and row types for the isolation tables.

pub mod connection;
pub mod model;
pub mod schema;
