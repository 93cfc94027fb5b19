use std::time::Duration;

use thiserror::Error;

use crate::domain::id::WalletId;
use crate::domain::mode::Mode;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Violations of the demo/real isolation boundary.
///
/// None of these are transient. They are correctness signals and must
/// abort the operation that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsolationError {
    /// An entity referenced by an operation is classified differently from
    /// the mode the operation resolved to.
    #[error("mode mismatch for wallet {wallet_id}: operation resolved {resolved}, wallet is {actual}")]
    ModeMismatch {
        resolved: Mode,
        actual: Mode,
        wallet_id: WalletId,
    },

    /// A connector was requested whose money class disagrees with the
    /// ambient mode.
    #[error("connector '{connector}' is {connector_mode} but the operation runs in {context}")]
    WhitelistViolation {
        connector: String,
        context: Mode,
        connector_mode: Mode,
    },

    /// The store router was used before `initialize()` or after `close()`.
    #[error("store router used before initialization")]
    RouterNotInitialized,

    #[error("no connector registered for '{0}'")]
    UnknownConnector(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Isolation(#[from] IsolationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Whether the error must be surfaced to the caller as an authorization
    /// rejection rather than an internal failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Isolation(
                IsolationError::ModeMismatch { .. } | IsolationError::WhitelistViolation { .. }
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
