//! # Shared Types Crate
//!
//! Wire entities, transport ports and small shared utilities used by every
//! Shardnet crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: payload shapes and topic names live here so
//!   that interceptors and resolvers can never disagree on the wire format.
//! - **Untrusted by default**: entities keep raw byte fields; structural
//!   checks belong to the interceptors.
//! - **Transport as a port**: `Messenger` and `MessageProcessor` are traits;
//!   the in-memory network (`shared-bus`) and the seednode transport both
//!   implement them.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
pub mod entities;
pub mod errors;
pub mod message;
pub mod registry;
pub mod sharding;
pub mod topics;

pub use entities::*;
pub use errors::*;
pub use message::{Batch, MessageProcessor, Messenger, P2pMessage, ProcessError};
pub use registry::Registry;
pub use sharding::ShardCoordinator;
