//! Mode-keyed store routing.
//!
//! The router owns exactly two store handles, one per universe, and hands
//! out the one that matches a [`ModeContext`]. It is the only way the rest
//! of the crate reaches persistence.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::{
    DefinitionId, Flow, FlowId, Mode, ModeContext, Order, OrderId, Position, PositionId,
    UserWalletInstance, WalletDefinition, WalletId, WalletRecord,
};
use crate::error::{ConfigError, Error, IsolationError, Result};
use crate::port::outbound::store::{EntityStore, StoreOpener, PERFORMANCE_INDEXES};

/// A store handle bound to one universe.
///
/// Wallet instances can only be written through [`StoreHandle::register_wallet`],
/// which checks that the wallet belongs in this store. The raw store is not
/// reachable from a handle:
///
/// ```compile_fail
/// # use airgap::application::router::StoreHandle;
/// # use airgap::domain::UserWalletInstance;
/// # async fn write(handle: StoreHandle, wallet: UserWalletInstance) {
/// handle.save_wallet(&wallet).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct StoreHandle {
    mode: Mode,
    store: Arc<dyn EntityStore>,
}

impl StoreHandle {
    fn new(mode: Mode, store: Arc<dyn EntityStore>) -> Self {
        Self { mode, store }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Persist a wallet instance after checking that its classification
    /// matches this store.
    ///
    /// The definition is read from this store, so a wallet can only be
    /// registered next to its own definition.
    pub async fn register_wallet(&self, wallet: &UserWalletInstance) -> Result<()> {
        let definition = self.store.definition(&wallet.definition_id).await?;
        let record = WalletRecord {
            instance: wallet.clone(),
            definition,
        };
        let actual = record.classify();
        if actual != self.mode {
            warn!(
                wallet_id = %wallet.id,
                store = %self.mode,
                classified = %actual,
                signals = ?record.demo_signals(),
                "Refusing to register wallet in the wrong store"
            );
            return Err(IsolationError::ModeMismatch {
                resolved: self.mode,
                actual,
                wallet_id: wallet.id.clone(),
            }
            .into());
        }
        self.store.save_wallet(wallet).await?;
        debug!(wallet_id = %wallet.id, store = %self.mode, "Registered wallet");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Load a wallet record from this store only.
    pub async fn wallet(&self, id: &WalletId) -> Result<Option<WalletRecord>> {
        self.store.wallet(id).await
    }

    pub async fn definition(&self, id: &DefinitionId) -> Result<Option<WalletDefinition>> {
        self.store.definition(id).await
    }

    pub async fn flow(&self, id: &FlowId) -> Result<Option<Flow>> {
        self.store.flow(id).await
    }

    pub async fn order(&self, id: &OrderId) -> Result<Option<Order>> {
        self.store.order(id).await
    }

    pub async fn position(&self, id: &PositionId) -> Result<Option<Position>> {
        self.store.position(id).await
    }

    pub async fn save_definition(&self, definition: &WalletDefinition) -> Result<()> {
        self.store.save_definition(definition).await
    }

    pub async fn save_flow(&self, flow: &Flow) -> Result<()> {
        self.store.save_flow(flow).await
    }

    pub async fn save_order(&self, order: &Order) -> Result<()> {
        self.store.save_order(order).await
    }

    pub async fn save_position(&self, position: &Position) -> Result<()> {
        self.store.save_position(position).await
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct RoutedStores {
    demo: StoreHandle,
    real: StoreHandle,
}

impl RoutedStores {
    fn get(&self, mode: Mode) -> &StoreHandle {
        match mode {
            Mode::Demo => &self.demo,
            Mode::Real => &self.real,
        }
    }
}

/// Routes every data access to the store of the active mode.
pub struct StoreRouter {
    opener: Arc<dyn StoreOpener>,
    stores: RwLock<Option<RoutedStores>>,
}

impl StoreRouter {
    pub fn new(opener: Arc<dyn StoreOpener>) -> Self {
        Self {
            opener,
            stores: RwLock::new(None),
        }
    }

    /// Open both stores, verify they answer, and create indexes.
    ///
    /// A store that fails to open or ping aborts startup. Index creation
    /// is best effort. Calling this again on an initialized router is a
    /// no-op.
    pub async fn initialize(&self) -> Result<()> {
        if self.is_initialized() {
            debug!("Store router already initialized");
            return Ok(());
        }

        let demo = self.open(Mode::Demo).await?;
        let real = self.open(Mode::Real).await?;

        let mut stores = self.stores.write();
        if stores.is_none() {
            *stores = Some(RoutedStores { demo, real });
            info!("Store router initialized");
        }
        Ok(())
    }

    async fn open(&self, mode: Mode) -> Result<StoreHandle> {
        let store = self.opener.open(mode).await?;
        if store.mode() != mode {
            error!(requested = %mode, opened = %store.mode(), "Opener returned the wrong store");
            return Err(ConfigError::InvalidValue {
                field: "database",
                reason: format!("{mode} store reports itself as {}", store.mode()),
            }
            .into());
        }

        store.ping().await.map_err(|e| {
            error!(mode = %mode, error = %e, "Store failed liveness check");
            match e {
                Error::Connection(msg) => Error::Connection(format!("{mode} store: {msg}")),
                other => other,
            }
        })?;

        let mut created = 0usize;
        for index in PERFORMANCE_INDEXES {
            match store.create_index(index).await {
                Ok(()) => created += 1,
                Err(e) => warn!(
                    mode = %mode,
                    index = index.name,
                    error = %e,
                    "Could not create index, continuing without it"
                ),
            }
        }
        debug!(mode = %mode, created, total = PERFORMANCE_INDEXES.len(), "Store indexes ensured");

        Ok(StoreHandle::new(mode, store))
    }

    /// Store for the given context.
    pub fn get(&self, ctx: &ModeContext) -> Result<StoreHandle> {
        self.get_for(ctx.mode())
    }

    /// Store for the context bound to the current task.
    pub fn current(&self) -> Result<StoreHandle> {
        self.get_for(ModeContext::current_mode())
    }

    /// Store for an explicit mode.
    pub fn get_for(&self, mode: Mode) -> Result<StoreHandle> {
        match self.stores.read().as_ref() {
            Some(stores) => Ok(stores.get(mode).clone()),
            None => {
                error!(mode = %mode, "Store router used before initialization");
                Err(IsolationError::RouterNotInitialized.into())
            }
        }
    }

    /// Both handles, demo first. Used by the resolvers that probe both
    /// universes.
    pub(crate) fn both(&self) -> Result<(StoreHandle, StoreHandle)> {
        match self.stores.read().as_ref() {
            Some(stores) => Ok((stores.demo.clone(), stores.real.clone())),
            None => Err(IsolationError::RouterNotInitialized.into()),
        }
    }

    /// Drop both handles. Later calls fail until `initialize` runs again.
    pub fn close(&self) {
        if self.stores.write().take().is_some() {
            info!("Store router closed");
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.stores.read().is_some()
    }
}

impl fmt::Debug for StoreRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRouter")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryOpener, MemoryStore};
    use async_trait::async_trait;
    use chrono::Utc;

    fn definition(id: &str, is_demo: bool) -> WalletDefinition {
        WalletDefinition {
            id: DefinitionId::new(id),
            slug: id.to_string(),
            name: id.to_string(),
            is_demo,
            integration_type: "exchange".into(),
            capabilities: vec![],
        }
    }

    fn wallet(id: &str, definition: &str) -> UserWalletInstance {
        UserWalletInstance {
            id: WalletId::new(id),
            user_id: "user-1".into(),
            definition_id: DefinitionId::new(definition),
            use_testnet: false,
            credentials: None,
            created_at: Utc::now(),
        }
    }

    async fn initialized() -> (MemoryOpener, StoreRouter) {
        let opener = MemoryOpener::default();
        let router = StoreRouter::new(Arc::new(opener.clone()));
        router.initialize().await.unwrap();
        (opener, router)
    }

    #[tokio::test]
    async fn get_before_initialize_fails() {
        let router = StoreRouter::new(Arc::new(MemoryOpener::default()));
        let err = router.get(&ModeContext::new(Mode::Real)).unwrap_err();
        assert!(matches!(
            err,
            Error::Isolation(IsolationError::RouterNotInitialized)
        ));
    }

    #[tokio::test]
    async fn routes_by_context_mode() {
        let (_, router) = initialized().await;
        assert_eq!(router.get(&ModeContext::new(Mode::Demo)).unwrap().mode(), Mode::Demo);
        assert_eq!(router.get(&ModeContext::new(Mode::Real)).unwrap().mode(), Mode::Real);
        assert_eq!(router.get(&ModeContext::default()).unwrap().mode(), Mode::Demo);
    }

    #[tokio::test]
    async fn current_follows_task_binding() {
        let (_, router) = initialized().await;
        let mode = ModeContext::new(Mode::Real)
            .scope(async { router.current().unwrap().mode() })
            .await;
        assert_eq!(mode, Mode::Real);
        assert_eq!(router.current().unwrap().mode(), Mode::Demo);
    }

    #[tokio::test]
    async fn initialize_creates_indexes_in_both_stores() {
        let (opener, _router) = initialized().await;
        for mode in Mode::ALL {
            assert_eq!(opener.store(mode).indexes().len(), PERFORMANCE_INDEXES.len());
        }
    }

    #[tokio::test]
    async fn index_failure_is_not_fatal() {
        let opener = MemoryOpener::default();
        opener.store(Mode::Real).reject_index_creation(true);
        let router = StoreRouter::new(Arc::new(opener.clone()));

        router.initialize().await.unwrap();
        assert!(router.is_initialized());
        assert!(opener.store(Mode::Real).indexes().is_empty());
    }

    #[tokio::test]
    async fn unreachable_store_aborts_initialize() {
        let opener = MemoryOpener::default();
        opener.store(Mode::Real).set_offline(true);
        let router = StoreRouter::new(Arc::new(opener));

        assert!(matches!(router.initialize().await, Err(Error::Connection(_))));
        assert!(!router.is_initialized());
    }

    #[tokio::test]
    async fn opener_returning_wrong_store_is_rejected() {
        struct Crossed;

        #[async_trait]
        impl StoreOpener for Crossed {
            async fn open(&self, _mode: Mode) -> Result<Arc<dyn EntityStore>> {
                let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new(Mode::Demo));
                Ok(store)
            }
        }

        let router = StoreRouter::new(Arc::new(Crossed));
        assert!(matches!(router.initialize().await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn close_makes_router_unusable() {
        let (_, router) = initialized().await;
        router.close();
        assert!(!router.is_initialized());
        assert!(router.get_for(Mode::Demo).is_err());

        router.initialize().await.unwrap();
        assert!(router.get_for(Mode::Demo).is_ok());
    }

    #[tokio::test]
    async fn register_wallet_rejects_wrong_store() {
        let (_, router) = initialized().await;
        let real = router.get_for(Mode::Real).unwrap();
        let demo = router.get_for(Mode::Demo).unwrap();

        real.save_definition(&definition("binance", false)).await.unwrap();
        real.register_wallet(&wallet("w-real", "binance")).await.unwrap();

        demo.save_definition(&definition("paper", true)).await.unwrap();
        demo.register_wallet(&wallet("w-demo", "paper")).await.unwrap();

        // No definition in the real store classifies as demo.
        let err = real
            .register_wallet(&wallet("w-orphan", "paper"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Isolation(IsolationError::ModeMismatch {
                resolved: Mode::Real,
                actual: Mode::Demo,
                ..
            })
        ));
        assert!(real.wallet(&WalletId::new("w-orphan")).await.unwrap().is_none());
    }
}
