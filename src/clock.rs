//! Time sources for timestamps and elapsed-time fields.

use chrono::{DateTime, FixedOffset, Local};
use std::time::Instant;

/// Monotonic readings drive `processTime`; wall-clock readings drive `@timestamp`.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn wall(&self) -> DateTime<FixedOffset>;
}

/// The host clock, with wall time in the local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
