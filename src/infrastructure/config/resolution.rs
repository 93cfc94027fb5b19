//! Entity resolution settings.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Per-store timeout of one entity lookup. A lookup that exceeds it
    /// counts as a store failure and the resolution falls back to demo.
    pub lookup_timeout_ms: u64,
}

impl ResolutionConfig {
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 750,
        }
    }
}
