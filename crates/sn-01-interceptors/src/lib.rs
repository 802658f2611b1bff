//! # Interceptors Subsystem
//!
//! Admission control for inbound gossip. Every message arriving on a topic
//! passes through the interceptor registered for that topic before any of
//! its content reaches the data pools.
//!
//! ## Pipeline
//!
//! ```text
//! message ──→ antiflood (blacklist, peer quota)
//!         ──→ throttler slot (reject when full, never block)
//!         ──→ [multi-data] decode Batch ── fail ──→ blacklist both hops, void
//!         ──→ antiflood (topic quota, element count)
//!         ──→ per element: factory ── fail ──→ blacklist both hops
//!                          check_validity ── fail ──→ record error
//!                          shard relevance / whitelist ── miss ──→ drop
//!                          processor validate + save ──→ handlers
//!         ──→ release slot, return last element error
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Every started slot is released once | `domain/throttler.rs` - `ThrottleGuard` |
//! | A full throttler takes no slot | `InterceptorCore::pre_process` |
//! | One bad element never voids its siblings | `MultiDataInterceptor::intercept` |
//! | Undecodable data blacklists originator and relay | `InterceptorCore::blacklist_both` |
//! | Foreign-shard data is dropped unless whitelisted | `InterceptorCore::process_element` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  interceptors/ - single/multi data interceptors, container      │
//! │  adapters/     - P2pAntiflood, time sources                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - Interceptor trait                          │
//! │  ports/outbound.rs - throttler, antiflood, whitelist, processor │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ - quotas, blacklist, whitelist, intercepted data       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod interceptors;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use events::*;
pub use interceptors::*;
pub use ports::*;
