//! Domain types: modes, entities, classification and the whitelist.
//!
//! Nothing in this module performs I/O. Classification and whitelist
//! membership are pure functions of typed fields.

pub mod context;
pub mod id;
pub mod mode;
pub mod trading;
pub mod wallet;
pub mod whitelist;

pub use context::ModeContext;
pub use id::{DefinitionId, FlowId, OrderId, PositionId, WalletId};
pub use mode::Mode;
pub use trading::{EntityLinks, Flow, Order, OrderSide, Position};
pub use wallet::{DemoSignal, UserWalletInstance, WalletDefinition, WalletRecord};
pub use whitelist::Whitelist;
