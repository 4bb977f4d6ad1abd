//! Utility functions for the CLI.

use crate::config::Config;
use crate::internal;
use std::path::Path;

/// Loads the config from `path`, or from the default location.
///
/// # Errors
/// Propagates read and parse errors.
pub fn load_config(path: Option<&Path>) -> Result<Config, crate::Error> {
    match path {
        Some(path) => {
            internal::debug("CLI", &format!("Loading config from {}", path.display()));
            Config::load_from(path)
        }
        None => Config::load(),
    }
}

/// Splits a `KEY=VALUE` argument. The value may itself contain `=`.
#[must_use]
pub fn parse_field(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}
