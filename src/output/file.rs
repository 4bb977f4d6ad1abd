//! Append-only file sink with a lazily opened, repointable handle.

use crate::internal;

use super::Output;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct SinkState {
    path: PathBuf,
    /// `None` until the first write or `set_path`.
    file: Option<File>,
}

impl SinkState {
    /// Opens the handle if none is held.
    fn ensure_open(&mut self) -> Result<&mut File, crate::Error> {
        let file = match self.file.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        Ok(self.file.insert(file))
    }

    /// Flushes and drops the held handle.
    fn close(&mut self) {
        if let Some(mut file) = self.file.take()
            && let Err(e) = file.flush()
        {
            internal::warn(
                "SINK",
                &format!("Failed to flush {} on close: {e}", self.path.display()),
            );
        }
    }
}

/// Creates the parent directory tree, then opens `path` for appending.
fn open_append(path: &Path) -> Result<File, crate::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        match fs::create_dir_all(parent) {
            Ok(()) => {
                internal::debug("SINK", &format!("Created directory: {}", parent.display()));
            }
            Err(e) => {
                internal::error(
                    "SINK",
                    &format!("Failed to create directory {}: {}", parent.display(), e),
                );
                return Err(e.into());
            }
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    internal::trace("SINK", &format!("Opened {}", path.display()));
    Ok(file)
}

/// Expands a leading `~` so config values stay portable.
fn resolve_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.as_ref())
}

/// Owns the single destination file of a [`Context`](crate::Context).
///
/// The handle is opened on the first write (or eagerly by [`set_path`](Self::set_path))
/// and kept open. Every line goes out as one `write_all` on an append-mode
/// handle, so lines from one thread land in call order.
#[derive(Debug)]
pub struct AppendSink {
    state: Mutex<SinkState>,
}

impl AppendSink {
    /// Creates an unopened sink. Nothing touches the filesystem until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            state: Mutex::new(SinkState {
                path: resolve_path(&path.into()),
                file: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Repoints the sink and opens the new file right away.
    ///
    /// The previous handle is flushed and closed first. If the new file cannot
    /// be opened the path change still sticks; the next write retries the open.
    ///
    /// # Errors
    /// Directory creation or open failure for the new path.
    pub fn set_path(&self, path: impl AsRef<Path>) -> Result<&Self, crate::Error> {
        let path = resolve_path(path.as_ref());
        let mut state = self.lock();
        state.close();
        internal::debug(
            "SINK",
            &format!("Repointing {} -> {}", state.path.display(), path.display()),
        );
        state.path = path;
        state.ensure_open()?;
        Ok(self)
    }

    /// Current destination path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Whether a handle is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Returns a writer over a duplicate of the open handle, opening it
    /// first if needed. The stream does not hold the sink lock, so records
    /// can still be emitted while it is alive. It keeps appending to the file
    /// that was current when it was created, even after a later
    /// [`set_path`](Self::set_path).
    ///
    /// # Errors
    /// Directory creation, open or handle duplication failure.
    pub fn stream(&self) -> Result<Stream, crate::Error> {
        let mut state = self.lock();
        let file = state.ensure_open()?.try_clone()?;
        Ok(Stream {
            path: state.path.clone(),
            file,
        })
    }

    /// Appends `line` as-is; callers supply the trailing newline.
    ///
    /// # Errors
    /// Open or write failure.
    pub fn write(&self, line: &str) -> Result<(), crate::Error> {
        let mut state = self.lock();
        state.ensure_open()?.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Raw entry point for pre-serialized content.
    ///
    /// # Errors
    /// [`Error::UnexpectedContent`](crate::Error::UnexpectedContent) when
    /// `content` is not UTF-8 text, otherwise the same as [`write`](Self::write).
    pub fn write_bytes(&self, content: &[u8]) -> Result<(), crate::Error> {
        let text = std::str::from_utf8(content).map_err(|_| crate::Error::UnexpectedContent)?;
        self.write(text)
    }
}

impl Output for AppendSink {
    fn write(&self, line: &str) -> Result<(), crate::Error> {
        Self::write(self, line)
    }

    fn flush(&self) -> Result<(), crate::Error> {
        if let Some(file) = self.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Append-mode writer detached from the sink lock.
#[derive(Debug)]
pub struct Stream {
    path: PathBuf,
    file: File,
}

impl Stream {
    /// Path the stream appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
