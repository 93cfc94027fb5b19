//! In-memory entity store.
//!
//! Used by tests and by the testkit. Besides plain storage it counts
//! lookups and can simulate a slow or unreachable store, which is how the
//! fail-safe paths of the resolvers are exercised.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{
    DefinitionId, Flow, FlowId, Mode, Order, OrderId, Position, PositionId, UserWalletInstance,
    WalletDefinition, WalletId, WalletRecord,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EntityStore, IndexSpec, StoreOpener};

/// In-memory store for one universe.
#[derive(Debug)]
pub struct MemoryStore {
    mode: Mode,
    definitions: RwLock<HashMap<DefinitionId, WalletDefinition>>,
    wallets: RwLock<HashMap<WalletId, UserWalletInstance>>,
    flows: RwLock<HashMap<FlowId, Flow>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    positions: RwLock<HashMap<PositionId, Position>>,
    indexes: RwLock<Vec<&'static str>>,
    lookups: AtomicUsize,
    latency: RwLock<Option<Duration>>,
    offline: AtomicBool,
    reject_indexes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            definitions: RwLock::default(),
            wallets: RwLock::default(),
            flows: RwLock::default(),
            orders: RwLock::default(),
            positions: RwLock::default(),
            indexes: RwLock::default(),
            lookups: AtomicUsize::new(0),
            latency: RwLock::new(None),
            offline: AtomicBool::new(false),
            reject_indexes: AtomicBool::new(false),
        }
    }

    /// Number of entity lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reset_lookups(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }

    /// Delay every operation by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    /// Make every operation fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make index creation fail, as it would without DDL privileges.
    pub fn reject_index_creation(&self, reject: bool) {
        self.reject_indexes.store(reject, Ordering::SeqCst);
    }

    /// Names of indexes created so far.
    pub fn indexes(&self) -> Vec<&'static str> {
        self.indexes.read().clone()
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().len()
    }

    async fn enter(&self) -> Result<()> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Connection(format!("{} store unreachable", self.mode)));
        }
        Ok(())
    }

    async fn lookup(&self) -> Result<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.enter().await
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    fn mode(&self) -> Mode {
        self.mode
    }

    async fn ping(&self) -> Result<()> {
        self.enter().await
    }

    async fn create_index(&self, index: &IndexSpec) -> Result<()> {
        self.enter().await?;
        if self.reject_indexes.load(Ordering::SeqCst) {
            return Err(Error::Database(format!(
                "not authorized to create index {}",
                index.name
            )));
        }
        let mut indexes = self.indexes.write();
        if !indexes.contains(&index.name) {
            indexes.push(index.name);
        }
        Ok(())
    }

    async fn wallet(&self, id: &WalletId) -> Result<Option<WalletRecord>> {
        self.lookup().await?;
        let Some(instance) = self.wallets.read().get(id).cloned() else {
            return Ok(None);
        };
        let definition = self.definitions.read().get(&instance.definition_id).cloned();
        Ok(Some(WalletRecord {
            instance,
            definition,
        }))
    }

    async fn definition(&self, id: &DefinitionId) -> Result<Option<WalletDefinition>> {
        self.lookup().await?;
        Ok(self.definitions.read().get(id).cloned())
    }

    async fn flow(&self, id: &FlowId) -> Result<Option<Flow>> {
        self.lookup().await?;
        Ok(self.flows.read().get(id).cloned())
    }

    async fn order(&self, id: &OrderId) -> Result<Option<Order>> {
        self.lookup().await?;
        Ok(self.orders.read().get(id).cloned())
    }

    async fn position(&self, id: &PositionId) -> Result<Option<Position>> {
        self.lookup().await?;
        Ok(self.positions.read().get(id).cloned())
    }

    async fn save_definition(&self, definition: &WalletDefinition) -> Result<()> {
        self.enter().await?;
        self.definitions
            .write()
            .insert(definition.id.clone(), definition.clone());
        Ok(())
    }

    async fn save_wallet(&self, wallet: &UserWalletInstance) -> Result<()> {
        self.enter().await?;
        self.wallets.write().insert(wallet.id.clone(), wallet.clone());
        Ok(())
    }

    async fn save_flow(&self, flow: &Flow) -> Result<()> {
        self.enter().await?;
        self.flows.write().insert(flow.id.clone(), flow.clone());
        Ok(())
    }

    async fn save_order(&self, order: &Order) -> Result<()> {
        self.enter().await?;
        self.orders.write().insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn save_position(&self, position: &Position) -> Result<()> {
        self.enter().await?;
        self.positions
            .write()
            .insert(position.id.clone(), position.clone());
        Ok(())
    }
}

/// Opener handing out two pre-built memory stores.
#[derive(Debug, Clone)]
pub struct MemoryOpener {
    demo: Arc<MemoryStore>,
    real: Arc<MemoryStore>,
}

impl MemoryOpener {
    #[must_use]
    pub fn new(demo: Arc<MemoryStore>, real: Arc<MemoryStore>) -> Self {
        Self { demo, real }
    }

    #[must_use]
    pub fn store(&self, mode: Mode) -> &Arc<MemoryStore> {
        match mode {
            Mode::Demo => &self.demo,
            Mode::Real => &self.real,
        }
    }
}

impl Default for MemoryOpener {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryStore::new(Mode::Demo)),
            Arc::new(MemoryStore::new(Mode::Real)),
        )
    }
}

#[async_trait]
impl StoreOpener for MemoryOpener {
    async fn open(&self, mode: Mode) -> Result<Arc<dyn EntityStore>> {
        let store: Arc<dyn EntityStore> = self.store(mode).clone();
        Ok(store)
    }
}
