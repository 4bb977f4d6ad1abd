//! Stepwise [`Context`] construction.

use super::Context;
use crate::address::{AddressSource, LocalAddress};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigPatch, SinkConfig};
use crate::internal;
use crate::output::{AppendSink, ConsoleOutput, Output};
use std::path::PathBuf;
use std::sync::RwLock;

/// Collects config and collaborators, then builds a [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
    config: SinkConfig,
    address: Option<Box<dyn AddressSource>>,
    clock: Option<Box<dyn Clock>>,
    console: Option<Box<dyn Output>>,
    mirrors: Vec<Box<dyn Output>>,
}

impl ContextBuilder {
    /// Starts from the defaults for the current mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole config.
    #[must_use]
    pub fn config(mut self, config: SinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Layers a partial config over the current one.
    #[must_use]
    pub fn patch(mut self, patch: &ConfigPatch) -> Self {
        if let Err(e) = self.config.apply(patch) {
            internal::warn("CONFIG", &format!("Ignoring option: {e}"));
        }
        self
    }

    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.file_path = path.into();
        self
    }

    #[must_use]
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.config.device = device.into();
        self
    }

    /// Source of the default `@source`. Defaults to [`LocalAddress`].
    #[must_use]
    pub fn address(mut self, address: impl AddressSource + 'static) -> Self {
        self.address = Some(Box::new(address));
        self
    }

    /// Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Where lines go when `echo` is enabled. Defaults to [`ConsoleOutput`].
    #[must_use]
    pub fn console(mut self, output: impl Output + 'static) -> Self {
        self.console = Some(Box::new(output));
        self
    }

    /// Adds an output that receives a copy of every emitted line.
    #[must_use]
    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.mirrors.push(Box::new(output));
        self
    }

    #[must_use]
    pub fn build(self) -> Context {
        internal::debug(
            "CONTEXT",
            &format!(
                "Building context: path={}, device={}, mirrors={}",
                self.config.file_path.display(),
                self.config.device,
                self.mirrors.len()
            ),
        );
        Context {
            sink: AppendSink::new(self.config.file_path.clone()),
            config: RwLock::new(self.config),
            address: self
                .address
                .unwrap_or_else(|| Box::new(LocalAddress::new())),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            console: self
                .console
                .unwrap_or_else(|| Box::new(ConsoleOutput::new())),
            mirrors: self.mirrors,
        }
    }
}
