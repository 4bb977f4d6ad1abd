//! Configuration struct definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Device identity used when nothing is configured.
pub const DEFAULT_DEVICE: &str = "myapp";
/// Field length cap used when nothing is configured.
pub const DEFAULT_MAX_LENGTH: usize = 4096;
/// Log path in production mode.
pub const PRODUCTION_PATH: &str = "/data/logs/production.log";

/// Environment variable selecting the execution mode.
pub const MODE_ENV: &str = "STASHLOG_ENV";

/// Execution mode, which only decides the default log path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    /// Reads `STASHLOG_ENV`; `production` or `prod` selects production.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(MODE_ENV).map(|v| v.to_lowercase()) {
            Ok(v) if v == "production" || v == "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Development logs go under the XDG state directory so a checkout
    /// never needs write access to `/data`.
    #[must_use]
    pub fn default_path(self) -> PathBuf {
        match self {
            Self::Production => PathBuf::from(PRODUCTION_PATH),
            Self::Development => directories::ProjectDirs::from("", "", "stashlog").map_or_else(
                || PathBuf::from("log").join("production.log"),
                |dirs| {
                    dirs.state_dir()
                        .unwrap_or_else(|| dirs.data_dir())
                        .join("log")
                        .join("production.log")
                },
            ),
        }
    }
}

/// Live sink and record policy. Owned by a [`Context`](crate::Context);
/// each builder copies the policy values when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkConfig {
    /// Destination log file.
    pub file_path: PathBuf,
    /// Seeds `fromtype`, `totype` and `system`.
    pub device: String,
    /// Prepended to every `interface` field.
    pub prefix: String,
    /// Cap, in characters, on stored field values.
    pub max_length: usize,
    /// Fill `@timestamp` when the caller did not set one.
    pub timestamp: bool,
    /// Default `processTime` to the builder's age instead of 0.
    pub process_time: bool,
    /// Mirror every emitted line to stdout.
    pub echo: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::for_mode(Mode::from_env())
    }
}

impl SinkConfig {
    /// Defaults with the path chosen by `mode`.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            file_path: mode.default_path(),
            device: DEFAULT_DEVICE.to_string(),
            prefix: String::new(),
            max_length: DEFAULT_MAX_LENGTH,
            timestamp: true,
            process_time: false,
            echo: false,
        }
    }

    /// Layers `patch` over `self`; unset options keep their current value.
    ///
    /// # Errors
    /// Rejects `max_length = 0`. Every other option in the patch is still applied.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<(), crate::Error> {
        if let Some(ref path) = patch.file_path {
            self.file_path.clone_from(path);
        }
        if let Some(ref device) = patch.device {
            self.device.clone_from(device);
        }
        if let Some(ref prefix) = patch.prefix {
            self.prefix.clone_from(prefix);
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(process_time) = patch.process_time {
            self.process_time = process_time;
        }
        if let Some(echo) = patch.echo {
            self.echo = echo;
        }
        match patch.max_length {
            Some(0) => Err(crate::Error::InvalidConfig(
                "maxlength must be a positive integer".to_string(),
            )),
            Some(max) => {
                self.max_length = max;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Partial configuration. Accepts both snake_case keys and the camelCase
/// spellings (`filePath`, `maxlength`, `processTime`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    #[serde(alias = "filePath")]
    pub file_path: Option<PathBuf>,
    pub device: Option<String>,
    pub prefix: Option<String>,
    #[serde(alias = "maxlength", alias = "maxLength")]
    pub max_length: Option<usize>,
    pub timestamp: Option<bool>,
    #[serde(alias = "processTime")]
    pub process_time: Option<bool>,
    pub echo: Option<bool>,
}

impl ConfigPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    #[must_use]
    pub const fn timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = Some(enabled);
        self
    }

    #[must_use]
    pub const fn process_time(mut self, enabled: bool) -> Self {
        self.process_time = Some(enabled);
        self
    }

    #[must_use]
    pub const fn echo(mut self, enabled: bool) -> Self {
        self.echo = Some(enabled);
        self
    }
}

/// Diagnostic channel configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Threshold name; `None` falls back to `STASHLOG_DIAG`.
    pub level: Option<String>,
}
