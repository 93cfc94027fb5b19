//! Last-line check that an operation's mode matches the wallet it touches.
//!
//! Resolution can be overridden by a header or a claim. The gate re-checks
//! the referenced wallet against the resolved mode so that an override
//! can never point a real-money wallet at the demo pipeline or the reverse.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::application::operation::InboundOperation;
use crate::application::resolver::{EntityModeResolver, WalletClassification};
use crate::domain::{Mode, ModeContext, WalletId};
use crate::error::{IsolationError, Result};

/// Outcome of a successful gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The operation names no wallet; nothing to check.
    NoWalletReference,
    Approved { wallet_id: WalletId, mode: Mode },
}

#[derive(Debug, Clone)]
pub struct SafetyGate {
    entities: Arc<EntityModeResolver>,
}

impl SafetyGate {
    pub fn new(entities: Arc<EntityModeResolver>) -> Self {
        Self { entities }
    }

    /// Check the wallet referenced by `op`, if any, against `ctx`.
    pub async fn check(&self, ctx: &ModeContext, op: &InboundOperation) -> Result<GateDecision> {
        match op.wallet_reference() {
            Some(wallet_id) => self.check_wallet(ctx, &wallet_id).await,
            None => Ok(GateDecision::NoWalletReference),
        }
    }

    /// Reject unless the wallet classifies as the context's mode.
    ///
    /// An unknown wallet classifies as demo, so it is rejected under real
    /// and approved under demo. A failed lookup is treated the same way.
    pub async fn check_wallet(&self, ctx: &ModeContext, wallet_id: &WalletId) -> Result<GateDecision> {
        let classification = match self.entities.classify_wallet(wallet_id).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!(wallet_id = %wallet_id, error = %e, "Wallet lookup failed, classifying as demo");
                WalletClassification {
                    wallet_id: wallet_id.clone(),
                    mode: Mode::Demo,
                    found_in: None,
                    definition: None,
                    signals: Vec::new(),
                }
            }
        };

        if classification.mode != ctx.mode() {
            error!(
                wallet_id = %wallet_id,
                resolved = %ctx.mode(),
                actual = %classification.mode,
                origin = ctx.origin().unwrap_or("unknown"),
                signals = ?classification.signals,
                "Mode mismatch, rejecting operation"
            );
            return Err(IsolationError::ModeMismatch {
                resolved: ctx.mode(),
                actual: classification.mode,
                wallet_id: wallet_id.clone(),
            }
            .into());
        }

        debug!(wallet_id = %wallet_id, mode = %ctx.mode(), "Safety gate approved");
        Ok(GateDecision::Approved {
            wallet_id: wallet_id.clone(),
            mode: classification.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::universe::TestUniverse;
    use serde_json::json;

    async fn gate() -> (TestUniverse, SafetyGate) {
        let universe = TestUniverse::new().await;
        universe.seed_real_wallet("w-real", "binance").await;
        universe.seed_demo_wallet("w-demo").await;
        let gate = SafetyGate::new(universe.entity_resolver());
        (universe, gate)
    }

    fn is_mismatch(result: &Result<GateDecision>, resolved: Mode, actual: Mode) -> bool {
        matches!(
            result,
            Err(Error::Isolation(IsolationError::ModeMismatch { resolved: r, actual: a, .. }))
                if *r == resolved && *a == actual
        )
    }

    #[tokio::test]
    async fn approve_reject_matrix() {
        let (_u, gate) = gate().await;
        let demo = ModeContext::new(Mode::Demo);
        let real = ModeContext::new(Mode::Real);
        let w_real = WalletId::new("w-real");
        let w_demo = WalletId::new("w-demo");

        assert!(gate.check_wallet(&real, &w_real).await.is_ok());
        assert!(gate.check_wallet(&demo, &w_demo).await.is_ok());
        assert!(is_mismatch(
            &gate.check_wallet(&demo, &w_real).await,
            Mode::Demo,
            Mode::Real
        ));
        assert!(is_mismatch(
            &gate.check_wallet(&real, &w_demo).await,
            Mode::Real,
            Mode::Demo
        ));
    }

    #[tokio::test]
    async fn unknown_wallet_is_demo() {
        let (_u, gate) = gate().await;
        let ghost = WalletId::new("ghost");

        assert!(is_mismatch(
            &gate.check_wallet(&ModeContext::new(Mode::Real), &ghost).await,
            Mode::Real,
            Mode::Demo
        ));
        assert!(gate
            .check_wallet(&ModeContext::new(Mode::Demo), &ghost)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn operation_without_wallet_passes() {
        let (_u, gate) = gate().await;
        let op = InboundOperation::new("GET", "/flows").with_query("flow_id", "f-1");
        assert_eq!(
            gate.check(&ModeContext::new(Mode::Real), &op).await.unwrap(),
            GateDecision::NoWalletReference
        );
    }

    #[tokio::test]
    async fn checks_wallet_named_in_body() {
        let (_u, gate) = gate().await;
        let op = InboundOperation::new("POST", "/orders")
            .with_body(json!({ "user_wallet_id": "w-real" }));

        let decision = gate.check(&ModeContext::new(Mode::Real), &op).await.unwrap();
        assert_eq!(
            decision,
            GateDecision::Approved {
                wallet_id: WalletId::new("w-real"),
                mode: Mode::Real
            }
        );
    }

    #[tokio::test]
    async fn lookup_failure_rejects_real() {
        let (universe, gate) = gate().await;
        universe.store(Mode::Real).set_offline(true);
        universe.store(Mode::Demo).set_offline(true);

        let result = gate
            .check_wallet(&ModeContext::new(Mode::Real), &WalletId::new("w-real"))
            .await;
        assert!(is_mismatch(&result, Mode::Real, Mode::Demo));
    }
}
