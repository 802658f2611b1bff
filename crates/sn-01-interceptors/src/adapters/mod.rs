//! Adapters: concrete implementations of the outbound ports.

pub mod antiflood;
pub mod time;

pub use antiflood::{AntifloodConfig, P2pAntiflood};
pub use time::{ManualClock, SystemTimeSource};
