//! Stdout mirror for emitted lines, enabled with the `echo` option.

use super::Output;
use std::io::{self, Write};

/// Writes each line unchanged to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn write(&self, line: &str) -> Result<(), crate::Error> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        io::stdout().flush()?;
        Ok(())
    }
}
