//! Persistence port consumed by the router and the resolvers.
//!
//! One implementation instance serves exactly one universe. Nothing in
//! this trait lets a caller reach the other store through a handle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    DefinitionId, Flow, FlowId, Mode, Order, OrderId, Position, PositionId, UserWalletInstance,
    WalletDefinition, WalletId, WalletRecord,
};
use crate::error::Result;

/// A secondary index the router tries to create at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

/// Indexes that speed up the reference-graph probes.
pub const PERFORMANCE_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        name: "idx_user_wallets_definition",
        table: "user_wallets",
        columns: &["definition_id"],
    },
    IndexSpec {
        name: "idx_user_wallets_user",
        table: "user_wallets",
        columns: &["user_id"],
    },
    IndexSpec {
        name: "idx_flows_wallet",
        table: "flows",
        columns: &["wallet_id"],
    },
    IndexSpec {
        name: "idx_orders_wallet",
        table: "orders",
        columns: &["wallet_id"],
    },
    IndexSpec {
        name: "idx_orders_flow",
        table: "orders",
        columns: &["flow_id"],
    },
    IndexSpec {
        name: "idx_positions_wallet",
        table: "positions",
        columns: &["wallet_id"],
    },
    IndexSpec {
        name: "idx_positions_flow",
        table: "positions",
        columns: &["flow_id"],
    },
];

/// Storage operations for one universe.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// The universe this store holds.
    fn mode(&self) -> Mode;

    /// Liveness check.
    async fn ping(&self) -> Result<()>;

    /// Create a secondary index if it does not exist.
    async fn create_index(&self, index: &IndexSpec) -> Result<()>;

    /// Load a wallet instance together with its definition.
    async fn wallet(&self, id: &WalletId) -> Result<Option<WalletRecord>>;

    async fn definition(&self, id: &DefinitionId) -> Result<Option<WalletDefinition>>;

    async fn flow(&self, id: &FlowId) -> Result<Option<Flow>>;

    async fn order(&self, id: &OrderId) -> Result<Option<Order>>;

    async fn position(&self, id: &PositionId) -> Result<Option<Position>>;

    /// Save a definition, replacing if it exists.
    async fn save_definition(&self, definition: &WalletDefinition) -> Result<()>;

    /// Save a wallet instance, replacing if it exists.
    async fn save_wallet(&self, wallet: &UserWalletInstance) -> Result<()>;

    async fn save_flow(&self, flow: &Flow) -> Result<()>;

    async fn save_order(&self, order: &Order) -> Result<()>;

    async fn save_position(&self, position: &Position) -> Result<()>;
}

/// Opens the store of one universe. Called once per mode by the router.
#[async_trait]
pub trait StoreOpener: Send + Sync {
    async fn open(&self, mode: Mode) -> Result<Arc<dyn EntityStore>>;
}
