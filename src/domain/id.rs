//! Identifier newtypes for the entities in the trading graph.
//!
//! The inner strings are private so every identifier is constructed
//! through `new` or a `From` conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

entity_id!(
    /// User wallet instance identifier.
    WalletId
);

entity_id!(
    /// Wallet definition identifier.
    ///
    /// Definitions are shared reference data, so these are usually stable
    /// slugs rather than UUIDs.
    DefinitionId
);

entity_id!(
    /// Automated trading flow identifier.
    FlowId
);

entity_id!(OrderId);

entity_id!(PositionId);
