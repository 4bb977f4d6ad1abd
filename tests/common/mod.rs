//! Shared fixtures: a frozen clock, an in-memory output and context helpers.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};
use stashlog::{Clock, ConfigPatch, Context, FixedAddress, Mode, Output, SinkConfig};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

pub const SOURCE: &str = "10.0.0.7";

/// Clock that always reports the same instant and wall time.
pub struct FrozenClock {
    pub instant: Instant,
    pub wall: DateTime<FixedOffset>,
}

impl FrozenClock {
    pub fn at(instant: Instant) -> Self {
        let wall = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 9, 15, 0)
            .unwrap();
        Self { instant, wall }
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> Instant {
        self.instant
    }

    fn wall(&self) -> DateTime<FixedOffset> {
        self.wall
    }
}

/// Collects every line it receives.
#[derive(Default)]
pub struct MemoryOutput {
    pub lines: Mutex<Vec<String>>,
}

impl MemoryOutput {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Output for MemoryOutput {
    fn write(&self, line: &str) -> Result<(), stashlog::Error> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<(), stashlog::Error> {
        Ok(())
    }
}

/// Development defaults pointed at `path`, with a fixed source address.
pub fn context_at(path: &Path, patch: &ConfigPatch) -> Context {
    Context::builder()
        .config(SinkConfig::for_mode(Mode::Development))
        .file_path(path)
        .patch(patch)
        .address(FixedAddress::new(SOURCE))
        .build()
}

/// Same as [`context_at`] with a frozen clock.
pub fn frozen_context_at(path: &Path, patch: &ConfigPatch, clock: FrozenClock) -> Context {
    Context::builder()
        .config(SinkConfig::for_mode(Mode::Development))
        .file_path(path)
        .patch(patch)
        .address(FixedAddress::new(SOURCE))
        .clock(clock)
        .build()
}
