//! Two in-memory stores behind an initialized router.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::outbound::memory::{MemoryOpener, MemoryStore};
use crate::application::resolver::EntityModeResolver;
use crate::application::router::StoreRouter;
use crate::domain::{Flow, Mode, Order, Position, UserWalletInstance, WalletDefinition};
use crate::infrastructure::bootstrap::IsolationServices;
use crate::port::outbound::store::EntityStore;

use super::domain::{demo_definition, exchange_definition, wallet};

/// Lookup timeout used by test resolvers.
pub const TEST_LOOKUP_TIMEOUT: Duration = Duration::from_millis(200);

/// A demo store and a real store behind one [`StoreRouter`].
pub struct TestUniverse {
    pub opener: MemoryOpener,
    pub router: Arc<StoreRouter>,
}

impl TestUniverse {
    /// Router over two empty memory stores, already initialized.
    pub async fn new() -> Self {
        let opener = MemoryOpener::default();
        let router = Arc::new(StoreRouter::new(Arc::new(opener.clone())));
        router
            .initialize()
            .await
            .expect("memory router initializes");
        Self { opener, router }
    }

    pub fn store(&self, mode: Mode) -> &Arc<MemoryStore> {
        self.opener.store(mode)
    }

    /// Lookups served by each store, demo first.
    pub fn lookups(&self) -> (usize, usize) {
        (
            self.store(Mode::Demo).lookups(),
            self.store(Mode::Real).lookups(),
        )
    }

    pub fn reset_lookups(&self) {
        for mode in Mode::ALL {
            self.store(mode).reset_lookups();
        }
    }

    pub fn entity_resolver(&self) -> Arc<EntityModeResolver> {
        Arc::new(EntityModeResolver::new(
            Arc::clone(&self.router),
            TEST_LOOKUP_TIMEOUT,
        ))
    }

    pub fn services(&self) -> IsolationServices {
        IsolationServices::from_router(Arc::clone(&self.router), TEST_LOOKUP_TIMEOUT)
    }

    pub async fn save_definition(&self, mode: Mode, definition: &WalletDefinition) {
        self.store(mode)
            .save_definition(definition)
            .await
            .expect("save definition");
    }

    /// Definitions are reference data, so they go into both stores.
    pub async fn save_definition_everywhere(&self, definition: &WalletDefinition) {
        for mode in Mode::ALL {
            self.save_definition(mode, definition).await;
        }
    }

    pub async fn save_wallet(&self, mode: Mode, wallet: &UserWalletInstance) {
        self.store(mode).save_wallet(wallet).await.expect("save wallet");
    }

    pub async fn save_flow(&self, mode: Mode, flow: &Flow) {
        self.store(mode).save_flow(flow).await.expect("save flow");
    }

    pub async fn save_order(&self, mode: Mode, order: &Order) {
        self.store(mode).save_order(order).await.expect("save order");
    }

    pub async fn save_position(&self, mode: Mode, position: &Position) {
        self.store(mode)
            .save_position(position)
            .await
            .expect("save position");
    }

    /// A mainnet exchange wallet in the real store.
    pub async fn seed_real_wallet(&self, id: &str, exchange: &str) {
        self.save_definition_everywhere(&exchange_definition(exchange))
            .await;
        self.save_wallet(Mode::Real, &wallet(id, exchange)).await;
    }

    /// A paper wallet in the demo store.
    pub async fn seed_demo_wallet(&self, id: &str) {
        self.save_definition_everywhere(&demo_definition("paper"))
            .await;
        self.save_wallet(Mode::Demo, &wallet(id, "paper")).await;
    }
}
