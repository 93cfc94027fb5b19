//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`outbound::store::EntityStore`] - Persistence for one universe
//! - [`outbound::connector::Connector`] - Opaque exchange/wallet connector

pub mod outbound;
