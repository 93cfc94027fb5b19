//! Infrastructure configuration modules.

pub mod database;
pub mod logging;
pub mod resolution;
pub mod settings;
