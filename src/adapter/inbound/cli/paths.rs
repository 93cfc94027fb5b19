//! Path utilities for airgap.
//!
//! Operator files live under `~/.airgap/`:
//! - `~/.airgap/config.toml` - configuration

use std::path::PathBuf;

/// Returns the airgap home directory (`~/.airgap/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".airgap")
}

/// Returns the default config file path (`~/.airgap/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
