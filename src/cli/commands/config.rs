//! `stashlog config`: show what a record would be built against.

use crate::config::{Config, Mode};
use crate::internal;
use std::process::ExitCode;

/// Prints the effective sink configuration as TOML.
#[must_use]
pub fn cmd_config(config: &Config) -> ExitCode {
    let sink = config.sink_config(Mode::from_env());
    match toml::to_string(&sink) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            internal::error("CLI", &format!("Failed to render config: {e}"));
            ExitCode::FAILURE
        }
    }
}
