//! Application services.
//!
//! Routing, resolution, the safety gate and connector construction. These
//! coordinate the domain rules with the outbound ports.

pub mod connector;
pub mod gate;
pub mod guard;
pub mod job;
pub mod operation;
pub mod resolver;
pub mod router;
