//! `airgap migrate`: apply embedded migrations to both stores.

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::domain::Mode;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

pub async fn execute(config: &Config) -> Result<()> {
    for mode in Mode::ALL {
        let url = config.database.url(mode).to_string();
        let options = config.database.pool_options();
        tokio::task::spawn_blocking(move || {
            let pool = create_pool(&url, options)?;
            run_migrations(&pool)
        })
        .await
        .map_err(|e| Error::Connection(format!("{mode} migration task failed: {e}")))??;

        output::action_done("Migrated", &format!("{mode} store"));
    }
    Ok(())
}
