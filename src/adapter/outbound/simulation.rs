//! Paper-trading connector.
//!
//! Never talks to an exchange. It is the connector every demo wallet
//! with a simulation integration gets.

use crate::domain::{Mode, WalletId};
use crate::error::Result;
use crate::port::outbound::connector::{Connector, ConnectorRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedConnector {
    kind: String,
    wallet_id: Option<WalletId>,
}

impl SimulatedConnector {
    pub fn new(kind: impl Into<String>, wallet_id: Option<WalletId>) -> Self {
        Self {
            kind: kind.into(),
            wallet_id,
        }
    }

    /// Constructor suitable for registration with the connector factory.
    pub fn construct(kind: &str, request: &ConnectorRequest) -> Result<Box<dyn Connector>> {
        Ok(Box::new(Self::new(kind, request.wallet_id.clone())))
    }

    #[must_use]
    pub fn wallet_id(&self) -> Option<&WalletId> {
        self.wallet_id.as_ref()
    }
}

impl Connector for SimulatedConnector {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn mode(&self) -> Mode {
        Mode::Demo
    }
}
