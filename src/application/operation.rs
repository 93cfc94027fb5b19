//! Transport-neutral view of an inbound operation.
//!
//! The HTTP layer (or any other transport) fills one of these in after
//! authentication. The isolation pipeline reads override signals and entity
//! references from it and never touches the transport directly.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::domain::{FlowId, WalletId};

/// Fields that may carry an entity reference, in priority order.
pub const ENTITY_FIELDS: [EntityField; 3] = [
    EntityField::UserWalletId,
    EntityField::WalletId,
    EntityField::FlowId,
];

/// A parameter name that refers to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityField {
    UserWalletId,
    WalletId,
    FlowId,
}

impl EntityField {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserWalletId => "user_wallet_id",
            Self::WalletId => "wallet_id",
            Self::FlowId => "flow_id",
        }
    }

    #[must_use]
    pub const fn is_wallet(&self) -> bool {
        matches!(self, Self::UserWalletId | Self::WalletId)
    }
}

impl fmt::Display for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a parameter was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Query,
    Path,
    Body,
}

/// An entity reference extracted from an operation's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityReference {
    Wallet {
        field: EntityField,
        source: ParamSource,
        id: WalletId,
    },
    Flow {
        source: ParamSource,
        id: FlowId,
    },
}

impl EntityReference {
    #[must_use]
    pub fn field(&self) -> EntityField {
        match self {
            Self::Wallet { field, .. } => *field,
            Self::Flow { .. } => EntityField::FlowId,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Wallet { id, .. } => id.as_str(),
            Self::Flow { id, .. } => id.as_str(),
        }
    }
}

/// An authenticated inbound request or command.
#[derive(Debug, Clone, Default)]
pub struct InboundOperation {
    pub method: String,
    pub path: String,
    headers: HashMap<String, String>,
    claims: Option<Value>,
    query: HashMap<String, String>,
    path_params: HashMap<String, String>,
    body: Option<Value>,
}

impl InboundOperation {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Header names are case-insensitive.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Claims of the caller's already-verified token.
    #[must_use]
    pub fn with_claims(mut self, claims: Value) -> Self {
        self.claims = Some(claims);
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// A string claim. Non-string claims count as absent.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.as_ref()?.get(name)?.as_str()
    }

    /// Look a parameter up in query, path, then body.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<(ParamSource, String)> {
        if let Some(value) = non_empty(self.query.get(name)) {
            return Some((ParamSource::Query, value));
        }
        if let Some(value) = non_empty(self.path_params.get(name)) {
            return Some((ParamSource::Path, value));
        }
        let value = self.body.as_ref()?.get(name)?;
        let value = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!value.is_empty()).then_some((ParamSource::Body, value))
    }

    /// The highest-priority entity reference, if any.
    #[must_use]
    pub fn entity_reference(&self) -> Option<EntityReference> {
        ENTITY_FIELDS.iter().find_map(|field| {
            let (source, value) = self.param(field.name())?;
            Some(if field.is_wallet() {
                EntityReference::Wallet {
                    field: *field,
                    source,
                    id: WalletId::new(value),
                }
            } else {
                EntityReference::Flow {
                    source,
                    id: FlowId::new(value),
                }
            })
        })
    }

    /// The wallet this operation concerns, if it names one.
    #[must_use]
    pub fn wallet_reference(&self) -> Option<WalletId> {
        ENTITY_FIELDS
            .iter()
            .filter(|field| field.is_wallet())
            .find_map(|field| self.param(field.name()))
            .map(|(_, value)| WalletId::new(value))
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    let value = value?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headers_are_case_insensitive() {
        let op = InboundOperation::new("GET", "/orders").with_header("X-Trading-Mode", "real");
        assert_eq!(op.header("x-trading-mode"), Some("real"));
        assert_eq!(op.header("X-TRADING-MODE"), Some("real"));
    }

    #[test]
    fn non_string_claims_are_ignored() {
        let op = InboundOperation::new("GET", "/").with_claims(json!({ "trading_mode": 1 }));
        assert_eq!(op.claim("trading_mode"), None);

        let op = InboundOperation::new("GET", "/").with_claims(json!("not-an-object"));
        assert_eq!(op.claim("trading_mode"), None);
    }

    #[test]
    fn query_beats_path_beats_body() {
        let op = InboundOperation::new("POST", "/orders")
            .with_body(json!({ "wallet_id": "from-body" }))
            .with_path_param("wallet_id", "from-path");
        assert_eq!(
            op.param("wallet_id"),
            Some((ParamSource::Path, "from-path".to_string()))
        );

        let op = op.with_query("wallet_id", "from-query");
        assert_eq!(
            op.param("wallet_id"),
            Some((ParamSource::Query, "from-query".to_string()))
        );
    }

    #[test]
    fn field_priority_wins_over_source_priority() {
        let op = InboundOperation::new("POST", "/orders")
            .with_query("flow_id", "f-1")
            .with_body(json!({ "user_wallet_id": "w-1" }));

        match op.entity_reference() {
            Some(EntityReference::Wallet { field, source, id }) => {
                assert_eq!(field, EntityField::UserWalletId);
                assert_eq!(source, ParamSource::Body);
                assert_eq!(id, WalletId::new("w-1"));
            }
            other => panic!("expected wallet reference, got {other:?}"),
        }
    }

    #[test]
    fn flow_reference_when_no_wallet() {
        let op = InboundOperation::new("GET", "/flows/f-9").with_path_param("flow_id", "f-9");
        assert_eq!(
            op.entity_reference(),
            Some(EntityReference::Flow {
                source: ParamSource::Path,
                id: FlowId::new("f-9"),
            })
        );
        assert_eq!(op.wallet_reference(), None);
    }

    #[test]
    fn numeric_body_ids_are_accepted() {
        let op = InboundOperation::new("POST", "/x").with_body(json!({ "wallet_id": 42 }));
        assert_eq!(op.wallet_reference(), Some(WalletId::new("42")));
    }

    #[test]
    fn blank_values_are_skipped() {
        let op = InboundOperation::new("POST", "/x")
            .with_query("user_wallet_id", "  ")
            .with_body(json!({ "user_wallet_id": "", "wallet_id": null }));
        assert_eq!(op.entity_reference(), None);
    }
}
