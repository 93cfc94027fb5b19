//! Runtime wiring of the isolation services.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::sqlite::opener::SqliteOpener;
use crate::application::connector::ConnectorFactory;
use crate::application::gate::SafetyGate;
use crate::application::guard::ModeGuard;
use crate::application::resolver::{EntityModeResolver, ModeResolver};
use crate::application::router::StoreRouter;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Every isolation component, sharing one router.
#[derive(Debug, Clone)]
pub struct IsolationServices {
    pub router: Arc<StoreRouter>,
    pub entities: Arc<EntityModeResolver>,
    pub resolver: ModeResolver,
    pub gate: SafetyGate,
    pub guard: ModeGuard,
    pub connectors: Arc<ConnectorFactory>,
}

impl IsolationServices {
    /// Wire services around an existing router.
    pub fn from_router(router: Arc<StoreRouter>, lookup_timeout: Duration) -> Self {
        Self::with_connectors(router, lookup_timeout, ConnectorFactory::default())
    }

    /// Wire services with a custom connector factory.
    pub fn with_connectors(
        router: Arc<StoreRouter>,
        lookup_timeout: Duration,
        connectors: ConnectorFactory,
    ) -> Self {
        let entities = Arc::new(EntityModeResolver::new(Arc::clone(&router), lookup_timeout));
        let resolver = ModeResolver::new(Arc::clone(&entities));
        let gate = SafetyGate::new(Arc::clone(&entities));
        let guard = ModeGuard::new(resolver.clone(), gate.clone());
        Self {
            router,
            entities,
            resolver,
            gate,
            guard,
            connectors: Arc::new(connectors),
        }
    }
}

/// Router over the two SQLite stores named in `config`. Not yet initialized.
pub fn build_router(config: &Config) -> StoreRouter {
    let db = &config.database;
    let opener = SqliteOpener::new(
        db.demo_url.clone(),
        db.real_url.clone(),
        db.pool_options(),
        db.run_migrations,
    );
    StoreRouter::new(Arc::new(opener))
}

/// Open both stores and wire the services.
///
/// # Errors
///
/// Returns an error if either store cannot be opened or fails its
/// liveness check.
pub async fn build_services(config: &Config) -> Result<IsolationServices> {
    let router = Arc::new(build_router(config));
    router.initialize().await?;
    info!(
        lookup_timeout_ms = config.resolution.lookup_timeout_ms,
        "Isolation services ready"
    );
    Ok(IsolationServices::from_router(
        router,
        config.resolution.lookup_timeout(),
    ))
}
