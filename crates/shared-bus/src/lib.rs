//! # Shared Bus - In-Memory Gossip Network
//!
//! Implements the `Messenger` port over a process-local hub so that several
//! nodes can run in one test process.
//!
//! ```text
//! ┌──────────────┐  broadcast()    ┌──────────────────┐   deliver    ┌──────────────┐
//! │   Node A     │ ──────────────→ │ InMemoryNetwork  │ ───────────→ │   Node B     │
//! │  (Messenger) │                 │  nodes + links   │              │ (processor)  │
//! └──────────────┘                 └──────────────────┘              └──────────────┘
//! ```
//!
//! - Messages only cross links created with `connect`/`connect_all`.
//! - Broadcasts are not looped back to the sender.
//! - Processor errors are counted and logged, never returned to the sender.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod messenger;
pub mod network;

pub use messenger::InMemoryMessenger;
pub use network::{BusError, DeliveryMode, InMemoryNetwork, NodeStats};
