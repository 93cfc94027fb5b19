//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{flows, orders, positions, user_wallets, wallet_definitions};

/// Database row for a wallet definition.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = wallet_definitions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDefinitionRow {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub is_demo: bool,
    pub integration_type: String,
    /// JSON array of capability tags.
    pub capabilities: String,
}

/// Database row for a user wallet instance.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = user_wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserWalletRow {
    pub id: String,
    pub user_id: String,
    pub definition_id: String,
    pub use_testnet: bool,
    pub credentials: Option<String>,
    pub created_at: String,
}

/// Database row for a flow.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = flows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FlowRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub wallet_id: Option<String>,
    pub created_at: String,
}

/// Database row for an order.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: String,
    pub wallet_id: Option<String>,
    pub flow_id: Option<String>,
    pub symbol: String,
    pub side: String,
    /// Decimal rendered as text to keep full precision.
    pub quantity: String,
    pub status: String,
    pub created_at: String,
}

/// Database row for a position.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionRow {
    pub id: String,
    pub wallet_id: Option<String>,
    pub flow_id: Option<String>,
    pub symbol: String,
    pub quantity: String,
    pub opened_at: String,
}
