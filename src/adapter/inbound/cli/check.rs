//! `airgap check`: validate configuration and probe both stores.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::domain::Mode;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::settings::Config;

pub async fn execute(config_path: &Path, config: &Config) -> Result<()> {
    output::section("Configuration");
    if config_path.exists() {
        output::field("Config", config_path.display());
    } else {
        output::field("Config", "defaults");
        output::hint(&format!("no file at {}", config_path.display()));
    }
    output::field("Demo store", &config.database.demo_url);
    output::field("Real store", &config.database.real_url);
    output::field("Pool size", config.database.pool_size);
    output::field(
        "Lookup",
        format!("{} ms", config.resolution.lookup_timeout_ms),
    );
    output::success("Configuration is valid");

    output::section("Stores");
    let services = build_services(config).await?;
    for mode in Mode::ALL {
        let store = services.router.get_for(mode)?;
        store.ping().await?;
        output::success(&format!("{mode} store reachable"));
    }
    services.router.close();

    output::success("Check complete");
    Ok(())
}
