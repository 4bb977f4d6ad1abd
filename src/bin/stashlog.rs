//! `stashlog` binary: emit records from shell scripts and inspect config.
//!
//! Usage:
//!   stashlog emit --type request --to billing --field order=17
//!   stashlog config

use clap::Parser;
use stashlog::cli::{Cli, Command, cmd_config, cmd_emit, load_config};
use stashlog::internal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match config.diagnostics_level() {
        Some(level) => internal::init_with_level(level),
        None => internal::init(),
    }

    match cli.command {
        Command::Emit(ref args) => cmd_emit(&config, args),
        Command::Config => cmd_config(&config),
    }
}
