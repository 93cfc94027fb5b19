//! Connector port.
//!
//! Connectors are opaque here: the isolation layer only gates their
//! construction. Order placement and balance queries belong to the
//! concrete implementations.

use std::fmt;

use crate::domain::{Mode, WalletId};
use crate::error::Result;

/// An exchange or wallet connector instance.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Connector-type identifier it was built for.
    fn kind(&self) -> &str;

    /// Universe this instance moves funds in.
    fn mode(&self) -> Mode;
}

/// Inputs handed to a connector constructor.
#[derive(Clone, Default)]
pub struct ConnectorRequest {
    pub wallet_id: Option<WalletId>,
    /// Opaque credential blob from the wallet instance.
    pub credentials: Option<String>,
}

impl fmt::Debug for ConnectorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRequest")
            .field("wallet_id", &self.wallet_id)
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Builds one connector type.
pub type ConnectorConstructor =
    std::sync::Arc<dyn Fn(&str, &ConnectorRequest) -> Result<Box<dyn Connector>> + Send + Sync>;
