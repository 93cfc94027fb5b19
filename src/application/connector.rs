//! Whitelist-gated connector construction.
//!
//! Every connector in the process is built here. A connector is only
//! handed out when its money class, as decided by the compiled-in
//! whitelist, equals the mode of the calling operation. The check runs
//! before construction and again on the built instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::adapter::outbound::simulation::SimulatedConnector;
use crate::domain::whitelist::{is_testnet_variant, normalize};
use crate::domain::wallet::SIMULATION_INTEGRATION;
use crate::domain::{Mode, ModeContext, WalletRecord, Whitelist};
use crate::error::{IsolationError, Result};
use crate::port::outbound::connector::{Connector, ConnectorConstructor, ConnectorRequest};

/// Builder for [`ConnectorFactory`].
pub struct ConnectorFactoryBuilder {
    whitelist: Whitelist,
    constructors: HashMap<String, ConnectorConstructor>,
}

impl ConnectorFactoryBuilder {
    /// Register a constructor for `kind`, replacing any earlier one.
    #[must_use]
    pub fn register<F>(mut self, kind: &str, constructor: F) -> Self
    where
        F: Fn(&str, &ConnectorRequest) -> Result<Box<dyn Connector>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(normalize(kind), Arc::new(constructor));
        self
    }

    /// Use a different compile-time whitelist.
    #[must_use]
    pub fn whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = whitelist;
        self
    }

    pub fn build(self) -> ConnectorFactory {
        ConnectorFactory {
            whitelist: self.whitelist,
            constructors: self.constructors,
        }
    }
}

/// Builds connectors for the ambient mode.
pub struct ConnectorFactory {
    whitelist: Whitelist,
    constructors: HashMap<String, ConnectorConstructor>,
}

impl ConnectorFactory {
    /// Builder with the builtin whitelist and the simulation connector
    /// registered.
    pub fn builder() -> ConnectorFactoryBuilder {
        ConnectorFactoryBuilder {
            whitelist: Whitelist::builtin(),
            constructors: HashMap::new(),
        }
        .register(SIMULATION_INTEGRATION, SimulatedConnector::construct)
    }

    #[must_use]
    pub const fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Registered connector kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Check that `kind` may be built under `mode`, without building it.
    pub fn check(&self, mode: Mode, kind: &str) -> Result<()> {
        let connector_mode = self.whitelist.mode_of(kind);
        if connector_mode != mode {
            error!(
                connector = kind,
                context = %mode,
                connector_mode = %connector_mode,
                "Connector blocked by whitelist"
            );
            return Err(IsolationError::WhitelistViolation {
                connector: kind.to_string(),
                context: mode,
                connector_mode,
            }
            .into());
        }
        Ok(())
    }

    /// Build a connector of `kind` for the mode bound to the current task.
    pub fn create(&self, kind: &str, request: &ConnectorRequest) -> Result<Box<dyn Connector>> {
        let ctx = ModeContext::current();
        let kind = normalize(kind);
        self.check(ctx.mode(), &kind)?;

        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| IsolationError::UnknownConnector(kind.clone()))?;
        let connector = constructor(&kind, request)?;

        if connector.mode() != ctx.mode() {
            error!(
                connector = %kind,
                context = %ctx.mode(),
                connector_mode = %connector.mode(),
                "Constructed connector reports the wrong mode"
            );
            return Err(IsolationError::WhitelistViolation {
                connector: kind,
                context: ctx.mode(),
                connector_mode: connector.mode(),
            }
            .into());
        }

        info!(connector = %kind, mode = %ctx.mode(), wallet_id = ?request.wallet_id, "Connector created");
        Ok(connector)
    }

    /// Build the connector a wallet needs.
    ///
    /// The wallet must classify as the current mode. Its definition slug
    /// picks the connector kind, with a `-testnet` suffix for testnet
    /// instances.
    pub fn create_for_wallet(&self, record: &WalletRecord) -> Result<Box<dyn Connector>> {
        let mode = ModeContext::current_mode();
        let wallet_mode = record.classify();
        if wallet_mode != mode {
            error!(
                wallet_id = %record.instance.id,
                context = %mode,
                wallet_mode = %wallet_mode,
                "Refusing to build connector for a wallet of the other mode"
            );
            return Err(IsolationError::ModeMismatch {
                resolved: mode,
                actual: wallet_mode,
                wallet_id: record.instance.id.clone(),
            }
            .into());
        }

        let kind = connector_kind_for(record);
        debug!(wallet_id = %record.instance.id, connector = %kind, "Connector kind for wallet");
        self.create(
            &kind,
            &ConnectorRequest {
                wallet_id: Some(record.instance.id.clone()),
                credentials: record.instance.credentials.clone(),
            },
        )
    }
}

impl Default for ConnectorFactory {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ConnectorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorFactory")
            .field("whitelist", &self.whitelist)
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Connector kind for a wallet record.
///
/// Simulation integrations and wallets without a definition get the
/// simulation connector.
#[must_use]
pub fn connector_kind_for(record: &WalletRecord) -> String {
    let Some(definition) = &record.definition else {
        return SIMULATION_INTEGRATION.to_string();
    };
    if definition.integration_type.eq_ignore_ascii_case(SIMULATION_INTEGRATION) {
        return SIMULATION_INTEGRATION.to_string();
    }
    let slug = normalize(&definition.slug);
    if record.instance.use_testnet && !is_testnet_variant(&slug) {
        format!("{slug}-testnet")
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::domain::{demo_definition, exchange_definition, wallet, WalletBuilder};

    #[derive(Debug)]
    struct Venue {
        kind: String,
        mode: Mode,
    }

    impl Connector for Venue {
        fn kind(&self) -> &str {
            &self.kind
        }

        fn mode(&self) -> Mode {
            self.mode
        }
    }

    fn venue(mode: Mode) -> impl Fn(&str, &ConnectorRequest) -> Result<Box<dyn Connector>> {
        move |kind: &str, _: &ConnectorRequest| {
            let connector: Box<dyn Connector> = Box::new(Venue {
                kind: kind.to_string(),
                mode,
            });
            Ok(connector)
        }
    }

    fn factory() -> ConnectorFactory {
        ConnectorFactory::builder()
            .register("binance", venue(Mode::Real))
            .register("binance-testnet", venue(Mode::Demo))
            .build()
    }

    fn in_mode<T>(mode: Mode, f: impl FnOnce() -> T) -> T {
        ModeContext::new(mode).sync_scope(f)
    }

    fn violation(result: Result<Box<dyn Connector>>) -> Option<(Mode, Mode)> {
        match result {
            Err(Error::Isolation(IsolationError::WhitelistViolation {
                context,
                connector_mode,
                ..
            })) => Some((context, connector_mode)),
            _ => None,
        }
    }

    #[test]
    fn whitelist_matrix() {
        let factory = factory();
        let request = ConnectorRequest::default();

        assert!(in_mode(Mode::Real, || factory.create("binance", &request)).is_ok());
        assert!(in_mode(Mode::Demo, || factory.create("simulation", &request)).is_ok());
        assert!(in_mode(Mode::Demo, || factory.create("binance-testnet", &request)).is_ok());

        assert_eq!(
            violation(in_mode(Mode::Demo, || factory.create("binance", &request))),
            Some((Mode::Demo, Mode::Real))
        );
        assert_eq!(
            violation(in_mode(Mode::Real, || factory.create("simulation", &request))),
            Some((Mode::Real, Mode::Demo))
        );
        assert_eq!(
            violation(in_mode(Mode::Real, || factory.create("binance-testnet", &request))),
            Some((Mode::Real, Mode::Demo))
        );
    }

    #[test]
    fn unbound_caller_cannot_build_real_connectors() {
        let factory = factory();
        assert!(violation(factory.create("binance", &ConnectorRequest::default())).is_some());
    }

    #[test]
    fn kind_is_normalized() {
        let factory = factory();
        let connector = in_mode(Mode::Real, || {
            factory.create("  BINANCE ", &ConnectorRequest::default())
        })
        .unwrap();
        assert_eq!(connector.kind(), "binance");
    }

    #[test]
    fn unregistered_kind_is_unknown() {
        let factory = factory();
        let result = in_mode(Mode::Real, || factory.create("okx", &ConnectorRequest::default()));
        assert!(matches!(
            result,
            Err(Error::Isolation(IsolationError::UnknownConnector(kind))) if kind == "okx"
        ));
    }

    #[test]
    fn lying_constructor_is_caught() {
        let factory = ConnectorFactory::builder()
            .register("kraken", venue(Mode::Demo))
            .build();
        let result = in_mode(Mode::Real, || factory.create("kraken", &ConnectorRequest::default()));
        assert_eq!(violation(result), Some((Mode::Real, Mode::Demo)));
    }

    #[test]
    fn custom_whitelist() {
        static ONLY_OKX: &[&str] = &["okx"];
        let factory = ConnectorFactory::builder()
            .whitelist(Whitelist::from_static(ONLY_OKX))
            .register("okx", venue(Mode::Real))
            .register("binance", venue(Mode::Real))
            .build();
        let request = ConnectorRequest::default();

        assert!(in_mode(Mode::Real, || factory.create("okx", &request)).is_ok());
        assert!(violation(in_mode(Mode::Real, || factory.create("binance", &request))).is_some());
    }

    #[test]
    fn wallet_kinds() {
        let real = WalletRecord {
            instance: wallet("w", "binance"),
            definition: Some(exchange_definition("binance")),
        };
        assert_eq!(connector_kind_for(&real), "binance");

        let testnet = WalletRecord {
            instance: WalletBuilder::new("w", "binance").testnet(true).build(),
            definition: Some(exchange_definition("binance")),
        };
        assert_eq!(connector_kind_for(&testnet), "binance-testnet");

        let paper = WalletRecord {
            instance: wallet("w", "paper"),
            definition: Some(demo_definition("paper")),
        };
        assert_eq!(connector_kind_for(&paper), "simulation");

        let orphan = WalletRecord {
            instance: wallet("w", "gone"),
            definition: None,
        };
        assert_eq!(connector_kind_for(&orphan), "simulation");
    }

    #[test]
    fn create_for_wallet_checks_wallet_mode() {
        let factory = factory();
        let record = WalletRecord {
            instance: WalletBuilder::new("w-1", "binance").credentials("enc:abc").build(),
            definition: Some(exchange_definition("binance")),
        };

        assert!(in_mode(Mode::Real, || factory.create_for_wallet(&record)).is_ok());
        assert!(matches!(
            in_mode(Mode::Demo, || factory.create_for_wallet(&record)),
            Err(Error::Isolation(IsolationError::ModeMismatch { .. }))
        ));

        let paper = WalletRecord {
            instance: wallet("w-2", "paper"),
            definition: Some(demo_definition("paper")),
        };
        let connector = in_mode(Mode::Demo, || factory.create_for_wallet(&paper)).unwrap();
        assert_eq!(connector.kind(), "simulation");
        assert_eq!(connector.mode(), Mode::Demo);
    }
}
