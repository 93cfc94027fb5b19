//! Wallet definitions, user wallet instances and their classification.
//!
//! Classification is a pure function of the typed fields below. Four
//! independent predicates each mark a wallet as demo; a wallet is real only
//! when none of them fire.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DefinitionId, WalletId};
use super::mode::Mode;

/// Integration type of connectors that never touch an exchange.
pub const SIMULATION_INTEGRATION: &str = "simulation";

/// Static description of a connector type.
///
/// Definitions are reference data present in both stores. They describe
/// what a connector can do, never a money-moving instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDefinition {
    pub id: DefinitionId,
    pub slug: String,
    pub name: String,
    pub is_demo: bool,
    /// e.g. `"simulation"` or `"exchange"`.
    pub integration_type: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// A user's concrete binding to a [`WalletDefinition`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWalletInstance {
    pub id: WalletId,
    pub user_id: String,
    pub definition_id: DefinitionId,
    pub use_testnet: bool,
    /// Opaque, already-encrypted credential blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for UserWalletInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserWalletInstance")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("definition_id", &self.definition_id)
            .field("use_testnet", &self.use_testnet)
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A wallet instance loaded together with its definition.
///
/// The definition is optional because the reference may dangle; a missing
/// definition classifies as demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    pub instance: UserWalletInstance,
    pub definition: Option<WalletDefinition>,
}

impl WalletRecord {
    #[must_use]
    pub fn classify(&self) -> Mode {
        classify(self.definition.as_ref(), &self.instance)
    }

    #[must_use]
    pub fn demo_signals(&self) -> Vec<DemoSignal> {
        demo_signals(self.definition.as_ref(), &self.instance)
    }
}

/// One reason a wallet is classified as demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoSignal {
    /// The definition is explicitly flagged `is_demo`.
    DefinitionFlag,
    /// The definition's integration type is `simulation`.
    SimulationIntegration,
    /// The definition slug contains `demo`.
    DemoSlug,
    /// The instance talks to the exchange's testnet.
    Testnet,
    /// The definition could not be found.
    MissingDefinition,
    /// The wallet lives in the demo store. Only reported by store lookups,
    /// never by [`demo_signals`].
    DemoStore,
}

impl fmt::Display for DemoSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DefinitionFlag => "definition_flag",
            Self::SimulationIntegration => "simulation_integration",
            Self::DemoSlug => "demo_slug",
            Self::Testnet => "testnet",
            Self::MissingDefinition => "missing_definition",
            Self::DemoStore => "demo_store",
        };
        f.write_str(label)
    }
}

#[must_use]
pub fn is_flagged_demo(definition: &WalletDefinition) -> bool {
    definition.is_demo
}

#[must_use]
pub fn is_simulation_integration(definition: &WalletDefinition) -> bool {
    definition.integration_type == SIMULATION_INTEGRATION
}

/// Heuristic: a slug containing `demo` (any case) is a demo connector.
///
/// Known fragility: a real venue whose product name contains "demo" is
/// misclassified as demo. The whitelist in the connector factory is what
/// actually keeps such a venue from moving real funds.
#[must_use]
pub fn slug_mentions_demo(definition: &WalletDefinition) -> bool {
    definition.slug.to_ascii_lowercase().contains("demo")
}

#[must_use]
pub fn uses_testnet(instance: &UserWalletInstance) -> bool {
    instance.use_testnet
}

/// Every demo signal that fires for this wallet, in rule order.
#[must_use]
pub fn demo_signals(
    definition: Option<&WalletDefinition>,
    instance: &UserWalletInstance,
) -> Vec<DemoSignal> {
    let mut signals = Vec::new();
    match definition {
        Some(definition) => {
            if is_flagged_demo(definition) {
                signals.push(DemoSignal::DefinitionFlag);
            }
            if is_simulation_integration(definition) {
                signals.push(DemoSignal::SimulationIntegration);
            }
            if slug_mentions_demo(definition) {
                signals.push(DemoSignal::DemoSlug);
            }
        }
        None => signals.push(DemoSignal::MissingDefinition),
    }
    if uses_testnet(instance) {
        signals.push(DemoSignal::Testnet);
    }
    signals
}

/// Classify a wallet as demo or real.
#[must_use]
pub fn classify(definition: Option<&WalletDefinition>, instance: &UserWalletInstance) -> Mode {
    let Some(definition) = definition else {
        return Mode::Demo;
    };
    if is_flagged_demo(definition)
        || is_simulation_integration(definition)
        || slug_mentions_demo(definition)
        || uses_testnet(instance)
    {
        Mode::Demo
    } else {
        Mode::Real
    }
}
