//! Ports layer: traits at the boundaries of the resolver subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
