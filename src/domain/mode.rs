//! The two universes an operation can be scoped to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Trading universe.
///
/// `Demo` is the fail-safe default: anything that cannot be positively
/// identified as real money is treated as simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Demo,
    Real,
}

impl Mode {
    /// Both modes, demo first.
    pub const ALL: [Mode; 2] = [Mode::Demo, Mode::Real];

    /// Parse an override signal (header or token claim).
    ///
    /// Accepts exactly `"real"` or `"demo"`, case-insensitive and ignoring
    /// surrounding whitespace. Anything else yields `None` so the caller
    /// can fall through to the next signal.
    #[must_use]
    pub fn from_signal(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("real") {
            Some(Self::Real)
        } else if value.eq_ignore_ascii_case("demo") {
            Some(Self::Demo)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Real => "real",
        }
    }

    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, Self::Real)
    }

    /// The other universe.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Demo => Self::Real,
            Self::Real => Self::Demo,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_signal(s).ok_or_else(|| ConfigError::InvalidValue {
            field: "mode",
            reason: format!("expected 'demo' or 'real', got '{s}'"),
        })
    }
}
