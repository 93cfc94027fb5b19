//! Airgap - demo/real mode isolation for a multi-tenant trading platform.
//!
//! Every operation runs in exactly one of two universes: `demo` (simulated
//! funds) or `real` (live exchange funds). Each universe has its own store,
//! and nothing in one universe may read, write or trade against the other.
//!
//! # Architecture
//!
//! - **Resolution** - an inbound operation's mode comes from an explicit
//!   header, a token claim, or the entity it references, in that order,
//!   defaulting to demo.
//! - **Gate** - the referenced wallet is re-classified from its own fields
//!   and must match the resolved mode.
//! - **Routing** - all persistence goes through a router that hands out the
//!   store of the bound mode.
//! - **Connectors** - built only through a factory that checks the
//!   compiled-in real-money whitelist against the bound mode.
//!
//! # Modules
//!
//! - [`domain`] - Modes, entities, wallet classification, whitelist, context
//! - [`port`] - Store and connector traits
//! - [`adapter`] - SQLite and in-memory stores, simulation connector, CLI
//! - [`application`] - Router, resolvers, safety gate, guard, connector factory
//! - [`infrastructure`] - Configuration, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use airgap::application::operation::InboundOperation;
//! use airgap::infrastructure::bootstrap::build_services;
//! use airgap::infrastructure::config::settings::Config;
//!
//! # async fn example() -> airgap::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let services = build_services(&config).await?;
//!
//! let router = services.router.clone();
//! let op = InboundOperation::new("POST", "/orders").with_query("wallet_id", "w-1");
//! let placed = services
//!     .guard
//!     .run(&op, |ctx| async move {
//!         let store = router.get(&ctx)?;
//!         Ok(store.mode())
//!     })
//!     .await?;
//! # let _ = placed;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
