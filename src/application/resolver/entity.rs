//! Entity-to-mode resolution.
//!
//! Given an identifier, find out which universe it belongs to by probing
//! both stores and following the reference graph to a wallet:
//!
//! ```text
//! order / position ──▶ wallet            (direct link, terminal)
//!                 └──▶ flow ──▶ wallet
//! ```
//!
//! The wallet's fields decide the mode, not the store it was found in.
//! Each hop probes both stores concurrently, so one resolution costs at
//! most three lookups per store.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::application::router::{StoreHandle, StoreRouter};
use crate::domain::{
    DemoSignal, EntityLinks, FlowId, Mode, OrderId, PositionId, WalletId,
};
use crate::error::{Error, Result};

/// Default per-lookup timeout.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(750);

/// An entity whose mode can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Wallet(WalletId),
    Flow(FlowId),
    Order(OrderId),
    Position(PositionId),
}

impl EntityRef {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Wallet(_) => "wallet",
            Self::Flow(_) => "flow",
            Self::Order(_) => "order",
            Self::Position(_) => "position",
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Wallet(id) => id.as_str(),
            Self::Flow(id) => id.as_str(),
            Self::Order(id) => id.as_str(),
            Self::Position(id) => id.as_str(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// How a wallet was classified and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletClassification {
    pub wallet_id: WalletId,
    pub mode: Mode,
    /// Store the wallet was found in, `None` when it was not found.
    pub found_in: Option<Mode>,
    pub definition: Option<String>,
    pub signals: Vec<DemoSignal>,
}

impl WalletClassification {
    #[must_use]
    pub const fn found(&self) -> bool {
        self.found_in.is_some()
    }
}

/// Resolves the mode of wallets, flows, orders and positions.
#[derive(Debug)]
pub struct EntityModeResolver {
    router: Arc<StoreRouter>,
    lookup_timeout: Duration,
}

impl EntityModeResolver {
    pub fn new(router: Arc<StoreRouter>, lookup_timeout: Duration) -> Self {
        Self {
            router,
            lookup_timeout,
        }
    }

    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Resolve any entity, falling back to demo on store failure.
    pub async fn resolve(&self, entity: &EntityRef) -> Mode {
        match self.try_resolve(entity).await {
            Ok(mode) => mode,
            Err(e) => {
                warn!(entity = %entity, error = %e, "Entity resolution failed, defaulting to demo");
                Mode::Demo
            }
        }
    }

    pub async fn resolve_wallet(&self, id: &WalletId) -> Mode {
        self.resolve(&EntityRef::Wallet(id.clone())).await
    }

    pub async fn resolve_flow(&self, id: &FlowId) -> Mode {
        self.resolve(&EntityRef::Flow(id.clone())).await
    }

    pub async fn resolve_order(&self, id: &OrderId) -> Mode {
        self.resolve(&EntityRef::Order(id.clone())).await
    }

    pub async fn resolve_position(&self, id: &PositionId) -> Mode {
        self.resolve(&EntityRef::Position(id.clone())).await
    }

    /// Resolve an entity.
    ///
    /// A missing entity or a dangling reference resolves to demo. Only an
    /// unreachable or timed-out store produces an error.
    pub async fn try_resolve(&self, entity: &EntityRef) -> Result<Mode> {
        match entity {
            EntityRef::Wallet(id) => self.try_resolve_wallet(id).await,
            EntityRef::Flow(id) => self.try_resolve_flow(id).await,
            EntityRef::Order(id) => self.try_resolve_order(id).await,
            EntityRef::Position(id) => self.try_resolve_position(id).await,
        }
    }

    pub async fn try_resolve_wallet(&self, id: &WalletId) -> Result<Mode> {
        Ok(self.classify_wallet(id).await?.mode)
    }

    /// Find a wallet in either store and classify it.
    pub async fn classify_wallet(&self, id: &WalletId) -> Result<WalletClassification> {
        let found = self
            .probe("wallet lookup", |store| async move {
                store.wallet(id).await
            })
            .await?;

        let Some((found_in, record)) = found else {
            debug!(wallet_id = %id, "Wallet not found in either store, defaulting to demo");
            return Ok(WalletClassification {
                wallet_id: id.clone(),
                mode: Mode::Demo,
                found_in: None,
                definition: None,
                signals: Vec::new(),
            });
        };

        // Real needs both the wallet's own fields and its location to agree.
        let classified = record.classify();
        let mode = if classified == Mode::Real && found_in == Mode::Real {
            Mode::Real
        } else {
            Mode::Demo
        };
        if classified != found_in {
            warn!(
                wallet_id = %id,
                stored_in = %found_in,
                classified = %classified,
                "Wallet classification disagrees with the store it lives in, treating as demo"
            );
        }
        let mut signals = record.demo_signals();
        if found_in == Mode::Demo {
            signals.push(DemoSignal::DemoStore);
        }
        debug!(wallet_id = %id, mode = %mode, "Resolved wallet");

        Ok(WalletClassification {
            wallet_id: id.clone(),
            mode,
            found_in: Some(found_in),
            definition: record.definition.as_ref().map(|d| d.slug.clone()),
            signals,
        })
    }

    pub async fn try_resolve_flow(&self, id: &FlowId) -> Result<Mode> {
        let found = self
            .probe("flow lookup", |store| async move { store.flow(id).await })
            .await?;

        let Some((found_in, flow)) = found else {
            debug!(flow_id = %id, "Flow not found in either store, defaulting to demo");
            return Ok(Mode::Demo);
        };

        match &flow.wallet_id {
            Some(wallet_id) => self.try_resolve_wallet(wallet_id).await,
            None => {
                debug!(flow_id = %id, stored_in = %found_in, "Flow has no wallet, defaulting to demo");
                Ok(Mode::Demo)
            }
        }
    }

    pub async fn try_resolve_order(&self, id: &OrderId) -> Result<Mode> {
        let found = self
            .probe("order lookup", |store| async move { store.order(id).await })
            .await?;

        match found {
            Some((found_in, order)) => {
                self.follow_links("order", id.as_str(), found_in, order.links())
                    .await
            }
            None => {
                debug!(order_id = %id, "Order not found in either store, defaulting to demo");
                Ok(Mode::Demo)
            }
        }
    }

    pub async fn try_resolve_position(&self, id: &PositionId) -> Result<Mode> {
        let found = self
            .probe("position lookup", |store| async move {
                store.position(id).await
            })
            .await?;

        match found {
            Some((found_in, position)) => {
                self.follow_links("position", id.as_str(), found_in, position.links())
                    .await
            }
            None => {
                debug!(position_id = %id, "Position not found in either store, defaulting to demo");
                Ok(Mode::Demo)
            }
        }
    }

    /// A direct wallet link is terminal even when the wallet is missing.
    async fn follow_links(
        &self,
        kind: &'static str,
        id: &str,
        found_in: Mode,
        links: EntityLinks,
    ) -> Result<Mode> {
        if let Some(wallet_id) = &links.wallet_id {
            return self.try_resolve_wallet(wallet_id).await;
        }
        if let Some(flow_id) = &links.flow_id {
            return self.try_resolve_flow(flow_id).await;
        }
        debug!(
            kind,
            id,
            stored_in = %found_in,
            "No wallet or flow reference, defaulting to demo"
        );
        Ok(Mode::Demo)
    }

    /// Run `lookup` against both stores at once, each under the lookup
    /// timeout.
    async fn probe<T, F, Fut>(&self, operation: &'static str, lookup: F) -> Result<Option<(Mode, T)>>
    where
        F: Fn(StoreHandle) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let (demo, real) = self.router.both()?;
        let (demo_hit, real_hit) = tokio::join!(
            self.timed(operation, lookup(demo)),
            self.timed(operation, lookup(real)),
        );
        settle(operation, demo_hit, real_hit)
    }

    async fn timed<T>(&self, operation: &'static str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.lookup_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation,
                after: self.lookup_timeout,
            }),
        }
    }
}

/// Combine the two probe results.
///
/// A hit in either store wins over a failure in the other. With no hit, a
/// failure is surfaced so the caller cannot mistake it for "not found".
fn settle<T>(
    operation: &'static str,
    demo: Result<Option<T>>,
    real: Result<Option<T>>,
) -> Result<Option<(Mode, T)>> {
    match (demo, real) {
        (Ok(Some(found)), Ok(Some(_))) => {
            warn!(operation, "Entity present in both stores, using the demo copy");
            Ok(Some((Mode::Demo, found)))
        }
        (Ok(Some(found)), _) => Ok(Some((Mode::Demo, found))),
        (_, Ok(Some(found))) => Ok(Some((Mode::Real, found))),
        (Ok(None), Ok(None)) => Ok(None),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}
