//! Wall-clock source for the few operations that depend on "now".
//!
//! The clock's offset also decides which calendar day counts as today.

use chrono::{DateTime, FixedOffset, Local};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    /// The current instant, carrying the offset used for day boundaries.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the host clock in the host's local offset on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
