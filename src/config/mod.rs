//! TOML configuration loading.
//!
//! The file only ever holds a [`ConfigPatch`]: it is layered over the
//! mode-derived defaults, the same way [`Context::configure`](crate::Context::configure)
//! layers runtime changes over the live config.

mod structs;

pub use structs::{
    ConfigPatch, DEFAULT_DEVICE, DEFAULT_MAX_LENGTH, DiagnosticsConfig, MODE_ENV, Mode,
    PRODUCTION_PATH, SinkConfig,
};

use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `stashlog.toml`. An empty file is a valid config.
///
/// ```toml
/// [sink]
/// file_path = "/var/log/myapp/events.log"
/// device = "myapp"
/// maxlength = 2048
///
/// [diagnostics]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Sink and record policy overrides.
    pub sink: ConfigPatch,
    /// Diagnostic channel settings.
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Loads the config from the default location.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined, the file can't be
    /// read, or TOML parsing hits a syntax error. A missing file is not an error.
    pub fn load() -> Result<Self, crate::Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let path = Self::get_config_path()?;
        let config = Self::load_from(&path)?;
        internal::debug("CONFIG", &format!("Config resolved from {}", path.display()));
        Ok(config)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    /// Returns the TOML syntax or type error.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// `~/.config/stashlog/stashlog.toml` on Linux.
    ///
    /// # Errors
    /// Fails when the platform has no concept of a config directory.
    pub fn get_config_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("stashlog").join("stashlog.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// Mode defaults with the `[sink]` section applied. An invalid
    /// `maxlength` is reported and the default kept.
    #[must_use]
    pub fn sink_config(&self, mode: Mode) -> SinkConfig {
        let mut sink = SinkConfig::for_mode(mode);
        if let Err(e) = sink.apply(&self.sink) {
            internal::warn("CONFIG", &format!("Ignoring option: {e}"));
        }
        sink
    }

    /// Configured diagnostic threshold, if it names a valid level.
    #[must_use]
    pub fn diagnostics_level(&self) -> Option<Level> {
        let name = self.diagnostics.level.as_deref()?;
        match name.parse() {
            Ok(level) => Some(level),
            Err(e) => {
                internal::warn("CONFIG", &e.to_string());
                None
            }
        }
    }
}
