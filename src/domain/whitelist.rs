//! Connector types allowed to move real funds.
//!
//! The list is compiled into the binary. No config key, environment
//! variable or API can add to it at runtime.

use super::mode::Mode;

/// Connector-type identifiers considered real-money capable.
pub const REAL_MONEY_CONNECTORS: &[&str] = &[
    "binance",
    "bybit",
    "okx",
    "kraken",
    "coinbase",
    "bitget",
    "kucoin",
    "hyperliquid",
];

/// Substrings that mark an identifier as a testnet/sandbox variant.
pub const TESTNET_MARKERS: &[&str] = &["testnet", "sandbox"];

/// Immutable whitelist of real-money connector types.
#[derive(Debug, Clone, Copy)]
pub struct Whitelist {
    entries: &'static [&'static str],
}

impl Whitelist {
    /// The whitelist shipped with this build.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            entries: REAL_MONEY_CONNECTORS,
        }
    }

    /// A whitelist over another compile-time list.
    #[must_use]
    pub const fn from_static(entries: &'static [&'static str]) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &'static [&'static str] {
        self.entries
    }

    /// Exact membership after trimming and lowercasing.
    #[must_use]
    pub fn contains(&self, connector: &str) -> bool {
        let normalized = normalize(connector);
        self.entries.iter().any(|entry| *entry == normalized)
    }

    /// Money class of a connector identifier.
    ///
    /// Real only for whitelisted identifiers without a testnet marker.
    /// Testnet variants stay demo even when the base venue is whitelisted,
    /// because no real funds are reachable through them.
    #[must_use]
    pub fn mode_of(&self, connector: &str) -> Mode {
        if is_testnet_variant(connector) || !self.contains(connector) {
            Mode::Demo
        } else {
            Mode::Real
        }
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether the identifier names a testnet/sandbox variant.
#[must_use]
pub fn is_testnet_variant(connector: &str) -> bool {
    let normalized = normalize(connector);
    TESTNET_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

pub(crate) fn normalize(connector: &str) -> String {
    connector.trim().to_ascii_lowercase()
}
