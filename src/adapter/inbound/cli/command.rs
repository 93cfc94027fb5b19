//! Command-line interface definitions.
//!
//! Defines the CLI structure for the airgap operator tool using `clap`.
//! The subcommands validate a deployment, migrate both stores, resolve the
//! mode of a stored entity and print the compiled-in whitelist.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::paths;

/// Demo/real isolation operator tool
#[derive(Parser, Debug)]
#[command(name = "airgap")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and probe both stores
    Check,

    /// Apply pending migrations to both stores
    Migrate,

    /// Resolve which universe a stored entity belongs to
    Resolve(ResolveArgs),

    /// List connector types allowed to move real funds
    Whitelist,
}

/// Arguments for `airgap resolve`.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Entity type
    #[arg(value_enum)]
    pub kind: EntityKind,

    /// Entity identifier
    pub id: String,
}

/// Entity types accepted by `airgap resolve`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Wallet,
    Flow,
    Order,
    Position,
}
