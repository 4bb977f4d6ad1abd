//! CLI module for stashlog.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;
pub mod util;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stashlog - Append structured event records from the command line.
#[derive(Parser)]
#[command(
    name = "stashlog",
    version,
    about = "Append structured event records from the command line"
)]
pub struct Cli {
    /// Config file (defaults to ~/.config/stashlog/stashlog.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Emit one record.
    Emit(EmitArgs),
    /// Print the effective sink configuration.
    Config,
}

/// Arguments of `stashlog emit`.
#[derive(Debug, Default, clap::Args)]
pub struct EmitArgs {
    /// Log file to append to (overrides the config)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Device identity (overrides the config)
    #[arg(long)]
    pub device: Option<String>,
    /// Record type (@type)
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
    /// Record message (@message)
    #[arg(short, long)]
    pub message: Option<String>,
    /// Tag (@tags), repeatable
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Receiving device
    #[arg(long)]
    pub to: Option<String>,
    /// Sending device
    #[arg(long)]
    pub from: Option<String>,
    /// Interface name (prefixed by the configured prefix)
    #[arg(long)]
    pub interface: Option<String>,
    /// Parameters; a JSON object is query-string encoded
    #[arg(long)]
    pub param: Option<String>,
    /// Result payload
    #[arg(long)]
    pub result: Option<String>,
    /// Extra field as KEY=VALUE, repeatable
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
    /// Error message
    #[arg(long)]
    pub error: Option<String>,
    /// Error code stored as errorType
    #[arg(long, allow_negative_numbers = true, requires = "error")]
    pub code: Option<i64>,
    /// Elapsed time in milliseconds
    #[arg(long, value_name = "MS")]
    pub process_time: Option<f64>,
}

pub use commands::{apply_args, cmd_config, cmd_emit};
pub use util::{load_config, parse_field};
