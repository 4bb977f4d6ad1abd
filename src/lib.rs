//! `stashlog` - structured event logging to an append-only JSON line file.
//!
//! Each record is assembled through a chained [`EventBuilder`] and written as
//! one line of JSON: `@`-prefixed top-level keys (`@timestamp`, `@source`,
//! `@type`, `@tags`, `@message`) plus an `@fields` object of business fields.
//!
//! ```no_run
//! use stashlog::ConfigPatch;
//!
//! stashlog::configure(&ConfigPatch::new().file_path("logs/app.log").device("gateway"));
//!
//! stashlog::event()
//!     .kind("request")
//!     .from("mobile")
//!     .interface("/orders")
//!     .param("page=2")
//!     .result("ok")
//!     .emit();
//! ```
//!
//! Logging never interrupts the caller: setters drop bad values, and
//! [`emit`](EventBuilder::emit) turns sink failures into `false` plus a line on
//! the diagnostic channel (see [`internal`]).
//!
//! # Features
//!
//! - `cli` (default): the `stashlog` command-line binary

pub mod address;
pub mod clock;
pub mod config;
pub mod context;
pub mod event;
pub mod internal;
pub mod level;
pub mod output;

mod error;

#[cfg(feature = "cli")]
pub mod cli;

pub use address::{AddressSource, FixedAddress, InterfaceAddr, LocalAddress};
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigPatch, Mode, SinkConfig};
pub use context::{Context, ContextBuilder, configure, event, global};
pub use error::{Error, Result};
pub use event::{ErrorDetail, EventBuilder, FieldValue, ProcessTime, SelfDescribing};
pub use level::Level;
pub use output::{AppendSink, ConsoleOutput, Output};
