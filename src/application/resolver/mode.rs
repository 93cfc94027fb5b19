//! Operation-to-mode resolution.
//!
//! Signals are consulted in a fixed order and the first valid one wins:
//!
//! 1. the `x-trading-mode` header
//! 2. the `trading_mode` claim of the caller's token
//! 3. an entity reference among the operation's parameters
//! 4. demo
//!
//! Invalid override values fall through to the next signal.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use super::entity::{EntityModeResolver, EntityRef};
use crate::application::operation::{EntityReference, InboundOperation};
use crate::domain::{Mode, ModeContext};

/// Header carrying an explicit mode override.
pub const MODE_HEADER: &str = "x-trading-mode";

/// Token claim carrying an explicit mode override.
pub const MODE_CLAIM: &str = "trading_mode";

/// Which signal decided an operation's mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeSource {
    Header,
    TokenClaim,
    Entity { field: &'static str, id: String },
    Default,
}

impl fmt::Display for ModeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header:{MODE_HEADER}"),
            Self::TokenClaim => write!(f, "claim:{MODE_CLAIM}"),
            Self::Entity { field, id } => write!(f, "entity:{field}={id}"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// The mode of one operation and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub mode: Mode,
    pub source: ModeSource,
}

impl Resolution {
    /// Context for the operation, tagged with the deciding signal.
    #[must_use]
    pub fn into_context(self) -> ModeContext {
        ModeContext::with_origin(self.mode, self.source.to_string())
    }
}

/// Decides the mode of inbound operations.
#[derive(Debug, Clone)]
pub struct ModeResolver {
    entities: Arc<EntityModeResolver>,
}

impl ModeResolver {
    pub fn new(entities: Arc<EntityModeResolver>) -> Self {
        Self { entities }
    }

    pub async fn resolve(&self, op: &InboundOperation) -> Resolution {
        if let Some(resolution) = explicit_signal(op) {
            debug!(path = %op.path, mode = %resolution.mode, source = %resolution.source, "Mode from explicit signal");
            return resolution;
        }

        if let Some(reference) = op.entity_reference() {
            let entity = match &reference {
                EntityReference::Wallet { id, .. } => EntityRef::Wallet(id.clone()),
                EntityReference::Flow { id, .. } => EntityRef::Flow(id.clone()),
            };
            let mode = self.entities.resolve(&entity).await;
            let source = ModeSource::Entity {
                field: reference.field().name(),
                id: reference.id().to_string(),
            };
            debug!(path = %op.path, mode = %mode, source = %source, "Mode from entity reference");
            return Resolution { mode, source };
        }

        debug!(path = %op.path, "No mode signal, defaulting to demo");
        Resolution {
            mode: Mode::Demo,
            source: ModeSource::Default,
        }
    }
}

/// Header or claim override, if one is present and valid.
pub fn explicit_signal(op: &InboundOperation) -> Option<Resolution> {
    if let Some(raw) = op.header(MODE_HEADER) {
        match Mode::from_signal(raw) {
            Some(mode) => {
                return Some(Resolution {
                    mode,
                    source: ModeSource::Header,
                })
            }
            None => trace!(value = raw, "Ignoring invalid mode header"),
        }
    }

    if let Some(raw) = op.claim(MODE_CLAIM) {
        match Mode::from_signal(raw) {
            Some(mode) => {
                return Some(Resolution {
                    mode,
                    source: ModeSource::TokenClaim,
                })
            }
            None => trace!(value = raw, "Ignoring invalid mode claim"),
        }
    }

    None
}
