//! Unified error type for all stashlog operations.

/// Error type for stashlog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error (directory creation, file open, append).
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Record or field value could not be serialized.
    Serialize(serde_json::Error),
    /// Config value outside its allowed range.
    InvalidConfig(String),
    /// Raw sink content was not valid UTF-8 text.
    UnexpectedContent,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
            Self::InvalidConfig(s) => write!(f, "invalid config: {s}"),
            Self::UnexpectedContent => write!(f, "unexpected content type"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::ConfigDirNotFound | Self::InvalidConfig(_) | Self::UnexpectedContent => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
