//! One file per subcommand.

mod config;
mod emit;

pub use config::cmd_config;
pub use emit::{apply_args, cmd_emit};
