//! Time sources for block timestamps.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the timestamp, in whole seconds since the Unix epoch, stamped on new blocks.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch system clocks clamp to zero.
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// Starts at `start` and advances by `step` seconds on every reading,
/// stopping at `u64::MAX` instead of wrapping.
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicU64,
    step: u64,
}

impl SteppingClock {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> u64 {
        let step = self.step;
        match self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| Some(t.saturating_add(step)))
        {
            Ok(previous) | Err(previous) => previous,
        }
    }
}
