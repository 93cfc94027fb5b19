//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file. The two database URLs can be
//! overridden from the environment so deployments keep them out of the file.
//!
//! # Example
//!
//! ```no_run
//! use airgap::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use super::database::{DatabaseConfig, DEMO_URL_ENV, REAL_URL_ENV};
use super::logging::{LoggingConfig, LOG_FORMATS};
use super::resolution::ResolutionConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Demo and real store locations.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Entity resolution limits.
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl Config {
    /// Parse configuration from TOML content, apply environment overrides
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply either way.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is invalid or the resulting
    /// configuration fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply database URL overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = value(DEMO_URL_ENV) {
            self.database.demo_url = url;
        }
        if let Some(url) = value(REAL_URL_ENV) {
            self.database.real_url = url;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first invalid or missing field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let db = &self.database;
        if db.demo_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.demo_url",
            }
            .into());
        }
        if db.real_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.real_url",
            }
            .into());
        }
        let demo = store_location(&db.demo_url).ok_or_else(|| ConfigError::InvalidValue {
            field: "database.demo_url",
            reason: "in-memory databases cannot hold a store".to_string(),
        })?;
        let real = store_location(&db.real_url).ok_or_else(|| ConfigError::InvalidValue {
            field: "database.real_url",
            reason: "in-memory databases cannot hold a store".to_string(),
        })?;
        if demo == real {
            return Err(ConfigError::InvalidValue {
                field: "database.real_url",
                reason: "demo and real stores must be different databases".to_string(),
            }
            .into());
        }
        if db.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.pool_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if db.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.resolution.lookup_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolution.lookup_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

/// The file a SQLite URL opens, or `None` for an in-memory database.
///
/// Accepts plain paths, `sqlite://` and `file:` URLs. Relative paths are
/// resolved against the working directory and dot segments removed, so
/// two spellings of one file compare equal.
fn store_location(url: &str) -> Option<PathBuf> {
    let url = url.trim();
    let url = url.strip_prefix("sqlite://").unwrap_or(url);
    let url = url.strip_prefix("file:").unwrap_or(url);
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let in_memory = query.is_some_and(|q| {
        q.split('&')
            .any(|pair| pair.eq_ignore_ascii_case("mode=memory"))
    });
    if path.is_empty() || path == ":memory:" || in_memory {
        return None;
    }

    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let normalized = without_dot_segments(&absolute);

    // Resolve symlinks in the directory; the file itself may not exist yet.
    match (normalized.parent(), normalized.file_name()) {
        (Some(parent), Some(name)) => match std::fs::canonicalize(parent) {
            Ok(parent) => Some(parent.join(name)),
            Err(_) => Some(normalized),
        },
        _ => Some(normalized),
    }
}

fn without_dot_segments(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
