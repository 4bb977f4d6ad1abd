//! stashlog's own diagnostic channel.
//!
//! Failures inside the library (a dropped write, a rejected field value, an
//! unreadable config) are never returned to the code that is logging. They are
//! reported here instead, as plain lines on stderr, gated by a threshold.
//!
//! The threshold lives in a `OnceLock`: the first call to [`init`] or
//! [`init_with_level`] wins, and any diagnostic emitted before that lazily
//! initializes from the `STASHLOG_DIAG` environment variable.

use crate::level::Level;
use chrono::Local;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Environment variable holding the diagnostic threshold (`trace`..`error`).
pub const DIAG_ENV: &str = "STASHLOG_DIAG";

static THRESHOLD: OnceLock<Level> = OnceLock::new();

fn level_from_env() -> Level {
    std::env::var(DIAG_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// Initializes the threshold from `STASHLOG_DIAG`, defaulting to `warn`.
pub fn init() {
    THRESHOLD.get_or_init(level_from_env);
}

/// Initializes the threshold explicitly. Later calls are no-ops.
pub fn init_with_level(level: Level) {
    let was_init = THRESHOLD.get().is_some();
    THRESHOLD.get_or_init(|| level);
    if !was_init {
        debug("INTERNAL", &format!("Diagnostics threshold: {level}"));
    }
}

/// Currently active threshold.
#[must_use]
pub fn threshold() -> Level {
    *THRESHOLD.get_or_init(level_from_env)
}

/// Whether a diagnostic at `level` would be written.
#[must_use]
pub fn enabled(level: Level) -> bool {
    level >= threshold()
}

fn log(level: Level, scope: &str, msg: &str) {
    if !enabled(level) {
        return;
    }
    let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
    // stderr may be closed; nothing left to report to
    let _ = writeln!(io::stderr(), "{ts} [{}] {scope:<8} {msg}", level.tag());
}

pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Rejected values and dropped records.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// Sink failures.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
