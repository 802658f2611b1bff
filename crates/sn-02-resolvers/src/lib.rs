//! # Resolvers Subsystem
//!
//! Point-to-point data recovery. A node missing a header, transaction or
//! miniblock asks a few connected peers for it; a peer holding the data
//! answers on the base topic, where the local interceptor ingests the
//! response like any other gossip.
//!
//! ## Request / Response
//!
//! ```text
//!   requester                               responder
//!   ─────────                               ─────────
//!   request_data_from_hash(h)
//!     └─→ <topic>_REQUEST ───────────────→ antiflood, throttler
//!                                          decode RequestData ── fail ──→ blacklist both hops
//!                                          pool ──miss──→ storage ──miss──→ (no response)
//!   interceptor on <topic> ←──────────────── send(found, requester)
//! ```
//!
//! Nonce requests (headers only) translate through the nonce index before
//! the hash lookup.
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  resolvers/ - header, tx, miniblock resolvers, container, finder│
//! │  adapters/  - TopicResolverSender, StorageService, MemoryStorer │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - Resolver, HeaderRequester                  │
//! │  ports/outbound.rs - Storer, ResolverSender                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - bounded caches, nonce index, data pool, RequestData  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod resolvers;

pub use adapters::*;
pub use domain::*;
pub use events::*;
pub use ports::*;
pub use resolvers::*;
