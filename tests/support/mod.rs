//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use airgap::infrastructure::config::settings::Config;
use tempfile::TempDir;

/// A demo and a real SQLite file in a temporary directory.
pub struct TempStores {
    dir: TempDir,
}

impl TempStores {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn demo_url(&self) -> String {
        self.dir.path().join("demo.db").display().to_string()
    }

    pub fn real_url(&self) -> String {
        self.dir.path().join("real.db").display().to_string()
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.database.demo_url = self.demo_url();
        config.database.real_url = self.real_url();
        config.resolution.lookup_timeout_ms = 2_000;
        config
    }

    /// Write a config file pointing at both stores and return its path.
    pub fn write_config(&self) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        let contents = format!(
            r#"
[logging]
level = "warn"
format = "pretty"

[database]
demo_url = "{}"
real_url = "{}"
pool_size = 2

[resolution]
lookup_timeout_ms = 2000
"#,
            self.demo_url(),
            self.real_url()
        );
        std::fs::write(&path, contents).expect("write config");
        path
    }
}

/// Write arbitrary TOML into a fresh temp file.
pub fn write_temp_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).expect("write temp config");
    path
}
