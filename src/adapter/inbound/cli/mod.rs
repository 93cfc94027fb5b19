//! CLI module graph and dispatch.

pub mod check;
pub mod command;
pub mod migrate;
pub mod output;
pub mod paths;
pub mod resolve;
pub mod whitelist;

use command::{Cli, ColorChoice, Commands};
use output::OutputConfig;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Apply global flags: output mode and color override.
pub fn configure(cli: &Cli) {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => owo_colors::unset_override(),
    }
}

/// Log level implied by `-q`/`-v`, if any.
fn level_override() -> Option<&'static str> {
    if output::is_quiet() {
        return Some("error");
    }
    match output::verbosity() {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(level) = level_override() {
        config.logging.level = level.to_string();
    }
    config.init_logging();
    Ok(config)
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Whitelist => {
            whitelist::execute();
            Ok(())
        }
        Commands::Check => {
            let config = load_config(&cli)?;
            output::header(env!("CARGO_PKG_VERSION"));
            check::execute(&cli.config, &config).await
        }
        Commands::Migrate => {
            let config = load_config(&cli)?;
            migrate::execute(&config).await
        }
        Commands::Resolve(args) => {
            let config = load_config(&cli)?;
            resolve::execute(&config, args).await
        }
    }
}
