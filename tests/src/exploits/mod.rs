//! # Exploit Simulations
//!
//! Misbehaving peers against a running node: floods that exhaust quotas
//! and payloads built to fail decoding.

pub mod flooding;
pub mod malformed;
