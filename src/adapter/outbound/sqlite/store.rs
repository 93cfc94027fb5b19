//! SQLite entity store implementation.
//!
//! One [`SqliteStore`] wraps the connection pool of one universe. Diesel
//! calls are blocking, so every operation runs on tokio's blocking pool;
//! that keeps the async caller cancellable and lets resolver timeouts fire.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::{FlowRow, OrderRow, PositionRow, UserWalletRow, WalletDefinitionRow};
use super::database::schema::{flows, orders, positions, user_wallets, wallet_definitions};
use crate::domain::{
    DefinitionId, Flow, FlowId, Mode, Order, OrderId, OrderSide, Position, PositionId,
    UserWalletInstance, WalletDefinition, WalletId, WalletRecord,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EntityStore, IndexSpec};

/// SQLite-backed store for one universe.
#[derive(Clone)]
pub struct SqliteStore {
    mode: Mode,
    pool: DbPool,
}

impl SqliteStore {
    #[must_use]
    pub fn new(mode: Mode, pool: DbPool) -> Self {
        Self { mode, pool }
    }

    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| Error::Database(format!("store task failed: {e}")))?
    }
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::Parse(e.to_string()))?
        .with_timezone(&Utc))
}

fn parse_decimal(value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| Error::Parse(format!("invalid decimal '{value}': {e}")))
}

fn definition_from_row(row: WalletDefinitionRow) -> Result<WalletDefinition> {
    let capabilities: Vec<String> =
        serde_json::from_str(&row.capabilities).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(WalletDefinition {
        id: DefinitionId::from(row.id),
        slug: row.slug,
        name: row.name,
        is_demo: row.is_demo,
        integration_type: row.integration_type,
        capabilities,
    })
}

fn definition_to_row(definition: &WalletDefinition) -> Result<WalletDefinitionRow> {
    Ok(WalletDefinitionRow {
        id: definition.id.to_string(),
        slug: definition.slug.clone(),
        name: definition.name.clone(),
        is_demo: definition.is_demo,
        integration_type: definition.integration_type.clone(),
        capabilities: serde_json::to_string(&definition.capabilities)
            .map_err(|e| Error::Parse(e.to_string()))?,
    })
}

fn wallet_from_row(row: UserWalletRow) -> Result<UserWalletInstance> {
    Ok(UserWalletInstance {
        id: WalletId::from(row.id),
        user_id: row.user_id,
        definition_id: DefinitionId::from(row.definition_id),
        use_testnet: row.use_testnet,
        credentials: row.credentials,
        created_at: parse_time(&row.created_at)?,
    })
}

fn wallet_to_row(wallet: &UserWalletInstance) -> UserWalletRow {
    UserWalletRow {
        id: wallet.id.to_string(),
        user_id: wallet.user_id.clone(),
        definition_id: wallet.definition_id.to_string(),
        use_testnet: wallet.use_testnet,
        credentials: wallet.credentials.clone(),
        created_at: wallet.created_at.to_rfc3339(),
    }
}

fn flow_from_row(row: FlowRow) -> Result<Flow> {
    Ok(Flow {
        id: FlowId::from(row.id),
        user_id: row.user_id,
        name: row.name,
        wallet_id: row.wallet_id.map(WalletId::from),
        created_at: parse_time(&row.created_at)?,
    })
}

fn flow_to_row(flow: &Flow) -> FlowRow {
    FlowRow {
        id: flow.id.to_string(),
        user_id: flow.user_id.clone(),
        name: flow.name.clone(),
        wallet_id: flow.wallet_id.as_ref().map(ToString::to_string),
        created_at: flow.created_at.to_rfc3339(),
    }
}

fn order_from_row(row: OrderRow) -> Result<Order> {
    let side = OrderSide::parse(&row.side)
        .ok_or_else(|| Error::Parse(format!("invalid order side '{}'", row.side)))?;
    Ok(Order {
        id: OrderId::from(row.id),
        wallet_id: row.wallet_id.map(WalletId::from),
        flow_id: row.flow_id.map(FlowId::from),
        symbol: row.symbol,
        side,
        quantity: parse_decimal(&row.quantity)?,
        status: row.status,
        created_at: parse_time(&row.created_at)?,
    })
}

fn order_to_row(order: &Order) -> OrderRow {
    OrderRow {
        id: order.id.to_string(),
        wallet_id: order.wallet_id.as_ref().map(ToString::to_string),
        flow_id: order.flow_id.as_ref().map(ToString::to_string),
        symbol: order.symbol.clone(),
        side: order.side.as_str().to_string(),
        quantity: order.quantity.to_string(),
        status: order.status.clone(),
        created_at: order.created_at.to_rfc3339(),
    }
}

fn position_from_row(row: PositionRow) -> Result<Position> {
    Ok(Position {
        id: PositionId::from(row.id),
        wallet_id: row.wallet_id.map(WalletId::from),
        flow_id: row.flow_id.map(FlowId::from),
        symbol: row.symbol,
        quantity: parse_decimal(&row.quantity)?,
        opened_at: parse_time(&row.opened_at)?,
    })
}

fn position_to_row(position: &Position) -> PositionRow {
    PositionRow {
        id: position.id.to_string(),
        wallet_id: position.wallet_id.as_ref().map(ToString::to_string),
        flow_id: position.flow_id.as_ref().map(ToString::to_string),
        symbol: position.symbol.clone(),
        quantity: position.quantity.to_string(),
        opened_at: position.opened_at.to_rfc3339(),
    }
}

fn db_err(e: diesel::result::Error) -> Error {
    Error::Database(e.to_string())
}

#[async_trait]
impl EntityStore for SqliteStore {
    fn mode(&self) -> Mode {
        self.mode
    }

    async fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1").execute(conn).map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn create_index(&self, index: &IndexSpec) -> Result<()> {
        let statement = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            index.name,
            index.table,
            index.columns.join(", ")
        );
        self.with_conn(move |conn| {
            diesel::sql_query(statement).execute(conn).map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn wallet(&self, id: &WalletId) -> Result<Option<WalletRecord>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<UserWalletRow> = user_wallets::table
                .find(&id)
                .select(UserWalletRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;
            let Some(row) = row else {
                return Ok(None);
            };

            let definition: Option<WalletDefinitionRow> = wallet_definitions::table
                .find(&row.definition_id)
                .select(WalletDefinitionRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;

            Ok(Some(WalletRecord {
                instance: wallet_from_row(row)?,
                definition: definition.map(definition_from_row).transpose()?,
            }))
        })
        .await
    }

    async fn definition(&self, id: &DefinitionId) -> Result<Option<WalletDefinition>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<WalletDefinitionRow> = wallet_definitions::table
                .find(&id)
                .select(WalletDefinitionRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;
            row.map(definition_from_row).transpose()
        })
        .await
    }

    async fn flow(&self, id: &FlowId) -> Result<Option<Flow>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<FlowRow> = flows::table
                .find(&id)
                .select(FlowRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;
            row.map(flow_from_row).transpose()
        })
        .await
    }

    async fn order(&self, id: &OrderId) -> Result<Option<Order>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<OrderRow> = orders::table
                .find(&id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;
            row.map(order_from_row).transpose()
        })
        .await
    }

    async fn position(&self, id: &PositionId) -> Result<Option<Position>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<PositionRow> = positions::table
                .find(&id)
                .select(PositionRow::as_select())
                .first(conn)
                .optional()
                .map_err(db_err)?;
            row.map(position_from_row).transpose()
        })
        .await
    }

    async fn save_definition(&self, definition: &WalletDefinition) -> Result<()> {
        let row = definition_to_row(definition)?;
        self.with_conn(move |conn| {
            diesel::replace_into(wallet_definitions::table)
                .values(&row)
                .execute(conn)
                .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn save_wallet(&self, wallet: &UserWalletInstance) -> Result<()> {
        let row = wallet_to_row(wallet);
        self.with_conn(move |conn| {
            diesel::replace_into(user_wallets::table)
                .values(&row)
                .execute(conn)
                .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn save_flow(&self, flow: &Flow) -> Result<()> {
        let row = flow_to_row(flow);
        self.with_conn(move |conn| {
            diesel::replace_into(flows::table)
                .values(&row)
                .execute(conn)
                .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn save_order(&self, order: &Order) -> Result<()> {
        let row = order_to_row(order);
        self.with_conn(move |conn| {
            diesel::replace_into(orders::table)
                .values(&row)
                .execute(conn)
                .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn save_position(&self, position: &Position) -> Result<()> {
        let row = position_to_row(position);
        self.with_conn(move |conn| {
            diesel::replace_into(positions::table)
                .values(&row)
                .execute(conn)
                .map_err(db_err)?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{
        create_pool, run_migrations, PoolOptions,
    };
    use crate::port::outbound::store::PERFORMANCE_INDEXES;
    use rust_decimal_macros::dec;

    fn setup(mode: Mode) -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = format!("sqlite://{}", dir.path().join("store.db").display());
        let pool = create_pool(&url, PoolOptions::default()).expect("create pool");
        run_migrations(&pool).expect("run migrations");
        (dir, SqliteStore::new(mode, pool))
    }

    fn definition(slug: &str) -> WalletDefinition {
        WalletDefinition {
            id: DefinitionId::new(slug),
            slug: slug.to_string(),
            name: slug.to_string(),
            is_demo: false,
            integration_type: "exchange".to_string(),
            capabilities: vec!["spot".to_string(), "margin".to_string()],
        }
    }

    fn wallet(id: &str, definition_id: &str) -> UserWalletInstance {
        UserWalletInstance {
            id: WalletId::new(id),
            user_id: "u-1".to_string(),
            definition_id: DefinitionId::new(definition_id),
            use_testnet: false,
            credentials: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn wallet_loads_with_definition() {
        let (_dir, store) = setup(Mode::Real);
        store.save_definition(&definition("binance")).await.unwrap();
        store.save_wallet(&wallet("w-1", "binance")).await.unwrap();

        let record = store.wallet(&WalletId::new("w-1")).await.unwrap().unwrap();
        assert_eq!(record.instance.id, WalletId::new("w-1"));
        let loaded = record.definition.as_ref().expect("definition joined");
        assert_eq!(loaded.capabilities, vec!["spot", "margin"]);
        assert_eq!(record.classify(), Mode::Real);
    }

    #[tokio::test]
    async fn dangling_definition_loads_as_none() {
        let (_dir, store) = setup(Mode::Real);
        store.save_wallet(&wallet("w-2", "ghost")).await.unwrap();

        let record = store.wallet(&WalletId::new("w-2")).await.unwrap().unwrap();
        assert!(record.definition.is_none());
        assert_eq!(record.classify(), Mode::Demo);
    }

    #[tokio::test]
    async fn missing_entities_are_none() {
        let (_dir, store) = setup(Mode::Demo);
        assert!(store.wallet(&WalletId::new("nope")).await.unwrap().is_none());
        assert!(store.flow(&FlowId::new("nope")).await.unwrap().is_none());
        assert!(store.order(&OrderId::new("nope")).await.unwrap().is_none());
        assert!(store.position(&PositionId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn order_keeps_decimal_precision() {
        let (_dir, store) = setup(Mode::Demo);
        let order = Order {
            id: OrderId::new("o-1"),
            wallet_id: Some(WalletId::new("w-1")),
            flow_id: None,
            symbol: "ETHUSDT".to_string(),
            side: OrderSide::Sell,
            quantity: dec!(0.123456789),
            status: "open".to_string(),
            created_at: Utc::now(),
        };
        store.save_order(&order).await.unwrap();

        let loaded = store.order(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.quantity, dec!(0.123456789));
        assert_eq!(loaded.side, OrderSide::Sell);
        assert_eq!(loaded.wallet_id, Some(WalletId::new("w-1")));
    }

    #[tokio::test]
    async fn flow_and_position_roundtrip_references() {
        let (_dir, store) = setup(Mode::Real);
        let flow = Flow {
            id: FlowId::new("f-1"),
            user_id: "u-1".to_string(),
            name: "grid".to_string(),
            wallet_id: None,
            created_at: Utc::now(),
        };
        store.save_flow(&flow).await.unwrap();
        let position = Position {
            id: PositionId::new("p-1"),
            wallet_id: None,
            flow_id: Some(FlowId::new("f-1")),
            symbol: "BTCUSDT".to_string(),
            quantity: dec!(1),
            opened_at: Utc::now(),
        };
        store.save_position(&position).await.unwrap();

        assert!(store.flow(&flow.id).await.unwrap().unwrap().wallet_id.is_none());
        let loaded = store.position(&position.id).await.unwrap().unwrap();
        assert_eq!(loaded.flow_id, Some(FlowId::new("f-1")));
    }

    #[tokio::test]
    async fn indexes_are_created_idempotently() {
        let (_dir, store) = setup(Mode::Demo);
        for index in PERFORMANCE_INDEXES {
            store.create_index(index).await.unwrap();
            store.create_index(index).await.unwrap();
        }
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn index_on_unknown_table_fails() {
        let (_dir, store) = setup(Mode::Demo);
        let bogus = IndexSpec {
            name: "idx_bogus",
            table: "no_such_table",
            columns: &["id"],
        };
        assert!(store.create_index(&bogus).await.is_err());
    }
}
