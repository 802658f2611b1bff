//! Counting throttler.
//!
//! Bounds the number of messages processed concurrently on one interceptor.
//! `try_start_processing` checks and takes a slot in one compare-and-swap,
//! so racing callers never push the in-flight count past the bound. It
//! never blocks.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::events::InterceptorError;
use crate::ports::InterceptorThrottler;

#[derive(Debug)]
pub struct CountingThrottler {
    max_in_flight: u32,
    in_flight: AtomicU32,
    started: AtomicU64,
    ended: AtomicU64,
}

impl CountingThrottler {
    pub fn new(max_in_flight: u32) -> Result<Self, InterceptorError> {
        if max_in_flight == 0 {
            return Err(InterceptorError::InvalidConfig(
                "throttler bound must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            max_in_flight,
            in_flight: AtomicU32::new(0),
            started: AtomicU64::new(0),
            ended: AtomicU64::new(0),
        })
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Total `start_processing` calls since creation.
    pub fn total_started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    /// Total `end_processing` calls since creation.
    pub fn total_ended(&self) -> u64 {
        self.ended.load(Ordering::Relaxed)
    }
}

impl InterceptorThrottler for CountingThrottler {
    fn can_process(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) < self.max_in_flight
    }

    fn start_processing(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn try_start_processing(&self) -> bool {
        let taken = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_in_flight).then_some(n + 1)
            })
            .is_ok();
        if taken {
            self.started.fetch_add(1, Ordering::Relaxed);
        }
        taken
    }

    fn end_processing(&self) {
        // saturating: an unmatched end must not wrap the counter
        let _ = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        self.ended.fetch_add(1, Ordering::Relaxed);
    }
}

/// Holds one throttler slot; releases it exactly once on drop.
pub struct ThrottleGuard<'a> {
    throttler: &'a dyn InterceptorThrottler,
}

impl<'a> ThrottleGuard<'a> {
    /// Take a slot unconditionally.
    pub fn start(throttler: &'a dyn InterceptorThrottler) -> Self {
        throttler.start_processing();
        Self { throttler }
    }

    /// Take a slot if the throttler has one free.
    pub fn try_start(throttler: &'a dyn InterceptorThrottler) -> Option<Self> {
        throttler
            .try_start_processing()
            .then_some(Self { throttler })
    }
}

impl Drop for ThrottleGuard<'_> {
    fn drop(&mut self) {
        self.throttler.end_processing();
    }
}
