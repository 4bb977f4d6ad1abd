//! The shared state every record is built against: live config, the append
//! sink, the address source and the clock.
//!
//! Most programs use the lazily built process-wide context through
//! [`global`], [`event`] and [`configure`]; tests and embedders that need
//! isolation build their own with [`Context::builder`].

mod builder;

pub use builder::ContextBuilder;

use crate::address::AddressSource;
use crate::clock::Clock;
use crate::config::{Config, ConfigPatch, Mode, SinkConfig};
use crate::event::EventBuilder;
use crate::internal;
use crate::output::{AppendSink, Output};
use serde_json::{Map, Value};
use std::sync::{OnceLock, PoisonError, RwLock};

static GLOBAL: OnceLock<Context> = OnceLock::new();

/// Owns the sink and the policy applied to new records. `Send + Sync`; the
/// config sits behind an `RwLock` and the sink serializes its own writes.
pub struct Context {
    config: RwLock<SinkConfig>,
    sink: AppendSink,
    address: Box<dyn AddressSource>,
    clock: Box<dyn Clock>,
    /// Receives lines while `echo` is on. Stdout unless replaced.
    console: Box<dyn Output>,
    mirrors: Vec<Box<dyn Output>>,
}

impl Context {
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Context with the given config and the default address source and clock.
    #[must_use]
    pub fn new(config: SinkConfig) -> Self {
        ContextBuilder::new().config(config).build()
    }

    /// Context from a loaded config file, with defaults for the current [`Mode`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        if let Some(level) = config.diagnostics_level() {
            internal::init_with_level(level);
        }
        Self::new(config.sink_config(Mode::from_env()))
    }

    /// Snapshot of the live config.
    #[must_use]
    pub fn config(&self) -> SinkConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Layers `patch` over the live config. Builders created afterwards see the
    /// change; existing builders keep their copy. A new `file_path` repoints
    /// the sink immediately.
    ///
    /// The config write lock is held while the sink is repointed, so the
    /// configured path and the sink's path never disagree. Lock order is
    /// always config then sink.
    pub fn configure(&self, patch: &ConfigPatch) -> &Self {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let previous = config.file_path.clone();
        if let Err(e) = config.apply(patch) {
            internal::warn("CONFIG", &format!("Ignoring option: {e}"));
        }

        if config.file_path != previous
            && let Err(e) = self.sink.set_path(&config.file_path)
        {
            internal::error(
                "CONFIG",
                &format!("Failed to open {}: {e}", config.file_path.display()),
            );
        }
        drop(config);
        self
    }

    /// Starts a record with only the defaults.
    #[must_use]
    pub fn event(&self) -> EventBuilder<'_> {
        EventBuilder::new(self, Map::new())
    }

    /// Starts a record from a partial one. Non-object seeds are ignored.
    #[must_use]
    pub fn event_from(&self, seed: Value) -> EventBuilder<'_> {
        match seed {
            Value::Object(map) => EventBuilder::new(self, map),
            Value::Null => self.event(),
            other => {
                internal::warn("EVENT", &format!("Ignoring non-object seed: {other}"));
                self.event()
            }
        }
    }

    #[must_use]
    pub const fn sink(&self) -> &AppendSink {
        &self.sink
    }

    pub(crate) fn address(&self) -> &dyn AddressSource {
        self.address.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Sends one serialized line to the sink, then to every mirror.
    /// Only the sink's result counts; mirror failures are reported and skipped.
    pub(crate) fn dispatch(&self, line: &str, echo: bool) -> Result<(), crate::Error> {
        self.sink.write(line)?;
        internal::trace("EMIT", &format!("Appended {} bytes", line.len()));

        if echo && let Err(e) = self.console.write(line) {
            internal::warn("EMIT", &format!("Echo failed: {e}"));
        }
        for mirror in &self.mirrors {
            if let Err(e) = mirror.write(line) {
                internal::warn("EMIT", &format!("Mirror write failed: {e}"));
            }
        }
        Ok(())
    }

    /// Flushes the sink, the echo output and every mirror.
    ///
    /// # Errors
    /// Returns the first I/O error encountered.
    pub fn flush(&self) -> Result<(), crate::Error> {
        Output::flush(&self.sink)?;
        self.console.flush()?;
        for mirror in &self.mirrors {
            mirror.flush()?;
        }
        Ok(())
    }

    /// Number of mirror outputs attached.
    #[must_use]
    pub fn mirror_count(&self) -> usize {
        self.mirrors.len()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .field("mirrors", &self.mirrors.len())
            .finish_non_exhaustive()
    }
}

/// The process-wide context, built on first use from the default config file.
pub fn global() -> &'static Context {
    GLOBAL.get_or_init(|| {
        let config = Config::load().unwrap_or_else(|e| {
            internal::warn("CONFIG", &format!("Using defaults: {e}"));
            Config::default()
        });
        let ctx = Context::from_config(&config);
        internal::debug(
            "CONTEXT",
            &format!("Global context ready, sink at {}", ctx.sink.path().display()),
        );
        ctx
    })
}

/// Starts a record on the global context.
#[must_use]
pub fn event() -> EventBuilder<'static> {
    global().event()
}

/// Reconfigures the global context.
pub fn configure(patch: &ConfigPatch) -> &'static Context {
    global().configure(patch)
}
