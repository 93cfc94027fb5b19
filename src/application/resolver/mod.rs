//! Mode resolution for entities and inbound operations.

pub mod entity;
pub mod mode;

pub use entity::{EntityModeResolver, EntityRef, WalletClassification, DEFAULT_LOOKUP_TIMEOUT};
pub use mode::{ModeResolver, ModeSource, Resolution, MODE_CLAIM, MODE_HEADER};
