//! Outbound adapters: persistence and connectors.

pub mod memory;
pub mod simulation;
pub mod sqlite;
