//! Store locations and pool settings.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::sqlite::database::connection::PoolOptions;
use crate::domain::Mode;

/// Environment variable overriding `database.demo_url`.
pub const DEMO_URL_ENV: &str = "AIRGAP_DEMO_DATABASE_URL";

/// Environment variable overriding `database.real_url`.
pub const REAL_URL_ENV: &str = "AIRGAP_REAL_DATABASE_URL";

/// The two stores. They must never point at the same database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub demo_url: String,
    pub real_url: String,
    /// Connections per store.
    pub pool_size: u32,
    pub connect_timeout_ms: u64,
    /// Apply embedded migrations when the stores are opened.
    pub run_migrations: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn url(&self, mode: Mode) -> &str {
        match mode {
            Mode::Demo => &self.demo_url,
            Mode::Real => &self.real_url,
        }
    }

    #[must_use]
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_size: self.pool_size,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            demo_url: "airgap-demo.db".into(),
            real_url: "airgap-real.db".into(),
            pool_size: 5,
            connect_timeout_ms: 5_000,
            run_migrations: true,
        }
    }
}
