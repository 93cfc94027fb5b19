//! Opens the demo and real SQLite stores.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::database::connection::{create_pool, run_migrations, PoolOptions};
use super::store::SqliteStore;
use crate::domain::Mode;
use crate::error::{Error, Result};
use crate::port::outbound::store::{EntityStore, StoreOpener};

/// Builds one [`SqliteStore`] per universe from two distinct database URLs.
#[derive(Debug, Clone)]
pub struct SqliteOpener {
    demo_url: String,
    real_url: String,
    options: PoolOptions,
    migrate: bool,
}

impl SqliteOpener {
    pub fn new(
        demo_url: impl Into<String>,
        real_url: impl Into<String>,
        options: PoolOptions,
        migrate: bool,
    ) -> Self {
        Self {
            demo_url: demo_url.into(),
            real_url: real_url.into(),
            options,
            migrate,
        }
    }

    #[must_use]
    pub fn url(&self, mode: Mode) -> &str {
        match mode {
            Mode::Demo => &self.demo_url,
            Mode::Real => &self.real_url,
        }
    }
}

#[async_trait]
impl StoreOpener for SqliteOpener {
    async fn open(&self, mode: Mode) -> Result<Arc<dyn EntityStore>> {
        let url = self.url(mode).to_string();
        let options = self.options;
        let migrate = self.migrate;

        // r2d2 connects eagerly while building the pool.
        let pool = tokio::task::spawn_blocking(move || {
            let pool = create_pool(&url, options)?;
            if migrate {
                run_migrations(&pool)?;
            }
            Ok::<_, Error>(pool)
        })
        .await
        .map_err(|e| Error::Connection(format!("{mode} store open task failed: {e}")))??;

        info!(mode = %mode, migrated = migrate, "Opened SQLite store");
        let store: Arc<dyn EntityStore> = Arc::new(SqliteStore::new(mode, pool));
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_two_independent_stores() {
        let dir = tempfile::tempdir().unwrap();
        let demo = format!("sqlite://{}", dir.path().join("demo.db").display());
        let real = format!("sqlite://{}", dir.path().join("real.db").display());
        let opener = SqliteOpener::new(demo, real, PoolOptions::default(), true);

        let demo_store = opener.open(Mode::Demo).await.unwrap();
        let real_store = opener.open(Mode::Real).await.unwrap();

        assert_eq!(demo_store.mode(), Mode::Demo);
        assert_eq!(real_store.mode(), Mode::Real);
        demo_store.ping().await.unwrap();
        real_store.ping().await.unwrap();
    }
}
