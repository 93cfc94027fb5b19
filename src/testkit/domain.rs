//! Builders for domain entities used across tests.
//!
//! Definition ids equal their slugs so tests can refer to them by name.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    DefinitionId, Flow, FlowId, Order, OrderId, OrderSide, Position, PositionId,
    UserWalletInstance, WalletDefinition, WalletId,
};

/// A live exchange definition, e.g. `exchange_definition("binance")`.
pub fn exchange_definition(slug: &str) -> WalletDefinition {
    WalletDefinition {
        id: DefinitionId::new(slug),
        slug: slug.to_string(),
        name: slug.to_string(),
        is_demo: false,
        integration_type: "exchange".to_string(),
        capabilities: vec!["spot".to_string()],
    }
}

/// A paper-trading definition with the demo flag and simulation integration.
pub fn demo_definition(slug: &str) -> WalletDefinition {
    WalletDefinition {
        id: DefinitionId::new(slug),
        slug: slug.to_string(),
        name: slug.to_string(),
        is_demo: true,
        integration_type: crate::domain::wallet::SIMULATION_INTEGRATION.to_string(),
        capabilities: vec!["spot".to_string()],
    }
}

/// Builder for [`UserWalletInstance`].
#[derive(Debug, Clone)]
pub struct WalletBuilder {
    wallet: UserWalletInstance,
}

impl WalletBuilder {
    pub fn new(id: &str, definition: &str) -> Self {
        Self {
            wallet: UserWalletInstance {
                id: WalletId::new(id),
                user_id: "user-1".to_string(),
                definition_id: DefinitionId::new(definition),
                use_testnet: false,
                credentials: None,
                created_at: Utc::now(),
            },
        }
    }

    #[must_use]
    pub fn testnet(mut self, use_testnet: bool) -> Self {
        self.wallet.use_testnet = use_testnet;
        self
    }

    #[must_use]
    pub fn credentials(mut self, blob: &str) -> Self {
        self.wallet.credentials = Some(blob.to_string());
        self
    }

    #[must_use]
    pub fn user(mut self, user_id: &str) -> Self {
        self.wallet.user_id = user_id.to_string();
        self
    }

    pub fn build(self) -> UserWalletInstance {
        self.wallet
    }
}

/// A mainnet wallet bound to `definition`.
pub fn wallet(id: &str, definition: &str) -> UserWalletInstance {
    WalletBuilder::new(id, definition).build()
}

pub fn flow(id: &str, wallet: Option<&str>) -> Flow {
    Flow {
        id: FlowId::new(id),
        user_id: "user-1".to_string(),
        name: format!("flow {id}"),
        wallet_id: wallet.map(WalletId::new),
        created_at: Utc::now(),
    }
}

pub fn order(id: &str, wallet: Option<&str>, flow: Option<&str>) -> Order {
    Order {
        id: OrderId::new(id),
        wallet_id: wallet.map(WalletId::new),
        flow_id: flow.map(FlowId::new),
        symbol: "BTC-USDT".to_string(),
        side: OrderSide::Buy,
        quantity: Decimal::ONE,
        status: "new".to_string(),
        created_at: Utc::now(),
    }
}

pub fn position(id: &str, wallet: Option<&str>, flow: Option<&str>) -> Position {
    Position {
        id: PositionId::new(id),
        wallet_id: wallet.map(WalletId::new),
        flow_id: flow.map(FlowId::new),
        symbol: "BTC-USDT".to_string(),
        quantity: Decimal::ONE,
        opened_at: Utc::now(),
    }
}
