//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the two infrastructure dependencies of the
//! isolation layer: the per-universe entity stores and connector objects.

pub mod connector;
pub mod store;
