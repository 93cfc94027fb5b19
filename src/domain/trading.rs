//! Trading entities that live in exactly one store.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{FlowId, OrderId, PositionId, WalletId};

/// An automated trading flow. Its configuration may name the wallet it
/// trades through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub id: FlowId,
    pub user_id: String,
    pub name: String,
    pub wallet_id: Option<WalletId>,
    pub created_at: DateTime<Utc>,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order, referencing its wallet directly, through a flow, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub wallet_id: Option<WalletId>,
    pub flow_id: Option<FlowId>,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An open or closed position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub wallet_id: Option<WalletId>,
    pub flow_id: Option<FlowId>,
    pub symbol: String,
    pub quantity: Decimal,
    pub opened_at: DateTime<Utc>,
}

/// First-degree references of an order or position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLinks {
    pub wallet_id: Option<WalletId>,
    pub flow_id: Option<FlowId>,
}

impl Order {
    #[must_use]
    pub fn links(&self) -> EntityLinks {
        EntityLinks {
            wallet_id: self.wallet_id.clone(),
            flow_id: self.flow_id.clone(),
        }
    }
}

impl Position {
    #[must_use]
    pub fn links(&self) -> EntityLinks {
        EntityLinks {
            wallet_id: self.wallet_id.clone(),
            flow_id: self.flow_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_side_parses_its_own_labels() {
        assert_eq!(OrderSide::parse(OrderSide::Buy.as_str()), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse(OrderSide::Sell.as_str()), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("BUY"), None);
    }

    #[test]
    fn links_copy_both_references() {
        let order = Order {
            id: OrderId::new("o-1"),
            wallet_id: None,
            flow_id: Some(FlowId::new("f-1")),
            symbol: "BTCUSDT".into(),
            side: OrderSide::Buy,
            quantity: dec!(0.5),
            status: "open".into(),
            created_at: Utc::now(),
        };
        let links = order.links();
        assert!(links.wallet_id.is_none());
        assert_eq!(links.flow_id, Some(FlowId::new("f-1")));
    }
}
