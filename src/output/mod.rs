//! Line outputs. The [`AppendSink`] is the one destination every emitted
//! record lands in; the [`Output`] trait lets a context mirror the same lines
//! elsewhere (stdout, an in-memory buffer in tests) without touching the sink.

mod file;
mod terminal;

pub use file::{AppendSink, Stream};
pub use terminal::ConsoleOutput;

use std::sync::Arc;

/// Receives fully serialized record lines (JSON plus trailing `\n`).
///
/// `Send + Sync` so a [`Context`](crate::Context) can be shared across threads.
pub trait Output: Send + Sync {
    /// Appends one line.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn write(&self, line: &str) -> Result<(), crate::Error>;

    /// Pushes buffered data to the destination.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn flush(&self) -> Result<(), crate::Error>;
}

/// Lets the caller keep a handle on an output it attached to a context.
impl<T: Output + ?Sized> Output for Arc<T> {
    fn write(&self, line: &str) -> Result<(), crate::Error> {
        (**self).write(line)
    }

    fn flush(&self) -> Result<(), crate::Error> {
        (**self).flush()
    }
}
