//! The record builder.
//!
//! An [`EventBuilder`] accumulates one record: `@`-prefixed top-level keys plus
//! a map of string fields that ends up under `@fields`. It is seeded from its
//! [`Context`] on construction, mutated through chained setters, and consumed
//! by [`emit`](EventBuilder::emit), which appends one JSON line to the sink.
//!
//! ```no_run
//! use stashlog::{ConfigPatch, Context};
//!
//! let ctx = Context::builder()
//!     .patch(&ConfigPatch::new().file_path("/tmp/stashlog/events.log").device("billing"))
//!     .build();
//!
//! let ok = ctx
//!     .event()
//!     .to("ledger")
//!     .interface("charge")
//!     .param(serde_json::json!({"account": "a-17", "amount": 300}))
//!     .result("accepted")
//!     .process_time(12)
//!     .emit();
//! assert!(ok);
//! ```

mod normalize;
mod setters;
mod value;

pub use normalize::{LARGE_DATA_MARKER, collapse_whitespace, query_encode, truncate};
pub use setters::FIELD_SETTERS;
pub use value::{ErrorDetail, FieldValue, ProcessTime, SelfDescribing};

use crate::config::SinkConfig;
use crate::context::Context;
use crate::internal;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::time::Instant;

/// `errorType` written by [`EventBuilder::error`].
pub const DEFAULT_ERROR_CODE: i64 = -1;

/// Key under which the field map is serialized.
pub const FIELDS_KEY: &str = "@fields";

/// Record policy copied out of the live config when a builder is created.
#[derive(Debug, Clone)]
struct Policy {
    prefix: String,
    max_length: usize,
    timestamp: bool,
    process_time: bool,
    echo: bool,
}

impl Policy {
    fn from_config(config: &SinkConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            max_length: config.max_length,
            timestamp: config.timestamp,
            process_time: config.process_time,
            echo: config.echo,
        }
    }
}

/// Defaults filled on the first [`EventBuilder::to_record`] call.
#[derive(Debug)]
struct Deferred {
    timestamp: Option<String>,
    process_time: Option<String>,
}

/// ISO-8601 with a numeric offset, e.g. `2024-03-01T09:15:00+08:00`.
#[must_use]
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

fn elapsed_millis(now: Instant, marker: Instant) -> f64 {
    now.saturating_duration_since(marker).as_secs_f64() * 1000.0
}

/// Accumulates one structured record. See the [module docs](self).
pub struct EventBuilder<'ctx> {
    ctx: &'ctx Context,
    policy: Policy,
    top: Map<String, Value>,
    fields: Map<String, Value>,
    started_at: Instant,
    deferred: OnceCell<Deferred>,
}

impl<'ctx> EventBuilder<'ctx> {
    /// Seeds a builder from `ctx`. Members of `seed` override the defaults and
    /// are normalized like [`set`](Self::set); an `@fields` object seeds the
    /// field map through [`field`](Self::field).
    pub(crate) fn new(ctx: &'ctx Context, seed: Map<String, Value>) -> Self {
        let config = ctx.config();
        let policy = Policy::from_config(&config);

        let mut top = Map::new();
        top.insert(
            "@source".to_string(),
            Value::String(ctx.address().local_address()),
        );

        let mut fields = Map::new();
        for key in ["fromtype", "totype", "system"] {
            fields.insert(key.to_string(), Value::String(config.device.clone()));
        }

        let mut builder = Self {
            ctx,
            policy,
            top,
            fields,
            started_at: ctx.clock().now(),
            deferred: OnceCell::new(),
        };

        for (key, value) in seed {
            if key != FIELDS_KEY {
                builder = builder.set(key, value);
                continue;
            }
            match value {
                Value::Object(seed_fields) => {
                    for (field, value) in seed_fields {
                        builder = builder.field(field, value);
                    }
                }
                other => internal::warn(
                    "EVENT",
                    &format!("Ignoring non-object {FIELDS_KEY} seed: {other}"),
                ),
            }
        }

        builder
    }

    /// Stores a top-level key. String values have their whitespace collapsed;
    /// other JSON values are stored unchanged.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = match value.into() {
            Value::String(text) => Value::String(collapse_whitespace(&text)),
            other => other,
        };
        self.top.insert(key.into(), value);
        self
    }

    /// Stores a field after normalization. A value that fails to normalize is
    /// reported on the diagnostic channel and the builder is left unchanged.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        match normalize::normalize(value.into(), self.policy.max_length) {
            Ok(text) => {
                self.fields.insert(key, Value::String(text));
            }
            Err(e) => internal::warn("EVENT", &format!("Dropping field {key}: {e}")),
        }
        self
    }

    /// Stores any serde value as a field via its JSON encoding.
    #[must_use]
    pub fn field_serialized<T: Serialize + ?Sized>(
        self,
        key: impl Into<String>,
        value: &T,
    ) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => self.field(key, value),
            Err(e) => {
                internal::warn("EVENT", &format!("Dropping field {key}: {e}"));
                self
            }
        }
    }

    #[must_use]
    pub fn timestamp<Tz: TimeZone>(self, at: DateTime<Tz>) -> Self {
        let text = format_timestamp(&at.fixed_offset());
        self.set("@timestamp", text)
    }

    #[must_use]
    pub fn message(self, message: impl Into<String>) -> Self {
        self.set("@message", message.into())
    }

    /// Sets `@type`.
    #[must_use]
    pub fn kind(self, kind: impl Into<String>) -> Self {
        self.set("@type", kind.into())
    }

    #[must_use]
    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.set("@tags", tags)
    }

    /// Overrides the discovered `@source` address.
    #[must_use]
    pub fn source(self, address: impl Into<String>) -> Self {
        self.set("@source", address.into())
    }

    /// Sets `@errType`, the top-level error classification.
    #[must_use]
    pub fn err_type(self, kind: impl Into<Value>) -> Self {
        self.set("@errType", kind)
    }

    /// Sets `interface` to the configured prefix followed by `name`.
    #[must_use]
    pub fn interface(self, name: impl AsRef<str>) -> Self {
        let value = format!("{}{}", self.policy.prefix, name.as_ref());
        self.field("interface", value)
    }

    /// Sets `param`. Objects are query-string encoded (`a=1&b=2`); anything
    /// else goes through the regular field pipeline.
    #[must_use]
    pub fn param(self, value: impl Into<FieldValue>) -> Self {
        match value.into() {
            FieldValue::Json(Value::Object(map)) => {
                let encoded = query_encode(&map);
                self.field("param", encoded)
            }
            other => self.field("param", other),
        }
    }

    /// Sets `param`, storing objects as JSON text. Matches older log consumers
    /// that parse `param` as JSON rather than as a query string.
    #[must_use]
    pub fn param_json(self, value: impl Into<FieldValue>) -> Self {
        self.field("param", value)
    }

    /// Records an error with the default code of `-1`.
    #[must_use]
    pub fn error(self, detail: impl Into<ErrorDetail>) -> Self {
        self.error_with_code(detail, DEFAULT_ERROR_CODE)
    }

    /// Sets `errorMessage` and `errorType`.
    #[must_use]
    pub fn error_with_code(self, detail: impl Into<ErrorDetail>, code: i64) -> Self {
        let message = detail.into().to_string();
        self.field("errorMessage", message).field("errorType", code)
    }

    /// Sets `processTime` in whole milliseconds.
    ///
    /// An [`Instant`] marker is measured against the context clock now;
    /// numbers and durations are taken as the elapsed time itself. `()` is a no-op.
    #[must_use]
    pub fn process_time(self, value: impl Into<ProcessTime>) -> Self {
        let ms = match value.into() {
            ProcessTime::Unset => return self,
            ProcessTime::Since(marker) => elapsed_millis(self.ctx.clock().now(), marker),
            ProcessTime::Millis(ms) => ms,
        };
        self.field("processTime", normalize::floor_millis(ms))
    }

    /// When this builder was created, by the context clock.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// A top-level value as currently stored (deferred defaults excluded).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.top.get(key)
    }

    /// A field as currently stored (deferred defaults excluded).
    #[must_use]
    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn deferred(&self) -> &Deferred {
        self.deferred.get_or_init(|| {
            let clock = self.ctx.clock();
            let timestamp = (self.policy.timestamp && !self.top.contains_key("@timestamp"))
                .then(|| format_timestamp(&clock.wall()));
            let process_time = (!self.fields.contains_key("processTime")).then(|| {
                if self.policy.process_time {
                    let ms = elapsed_millis(clock.now(), self.started_at);
                    normalize::normalize(normalize::floor_millis(ms), usize::MAX)
                        .unwrap_or_else(|_| "0".to_string())
                } else {
                    "0".to_string()
                }
            });
            Deferred {
                timestamp,
                process_time,
            }
        })
    }

    /// The record as it would be written: top-level keys plus `@fields`.
    ///
    /// Deferred defaults (`@timestamp`, `processTime`) are computed on the
    /// first call and reused afterwards, so repeated calls agree.
    #[must_use]
    pub fn to_record(&self) -> Map<String, Value> {
        let deferred = self.deferred();

        let mut record = self.top.clone();
        if let Some(ref ts) = deferred.timestamp
            && !record.contains_key("@timestamp")
        {
            record.insert("@timestamp".to_string(), Value::String(ts.clone()));
        }

        let mut fields = self.fields.clone();
        if let Some(ref pt) = deferred.process_time
            && !fields.contains_key("processTime")
        {
            fields.insert("processTime".to_string(), Value::String(pt.clone()));
        }

        record.insert(FIELDS_KEY.to_string(), Value::Object(fields));
        record
    }

    /// The record as one compact JSON line, newline included.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_line(&self) -> Result<String, crate::Error> {
        let mut line = serde_json::to_string(&self.to_record())?;
        line.push('\n');
        Ok(line)
    }

    /// Writes the record and returns the error instead of reporting it.
    ///
    /// # Errors
    /// Serialization failure or sink write failure.
    pub fn try_emit(self) -> Result<(), crate::Error> {
        let line = self.to_line()?;
        self.ctx.dispatch(&line, self.policy.echo)
    }

    /// Writes the record to the context's sink. Never fails loudly: on error
    /// the record is dropped, a diagnostic is written and `false` returned.
    pub fn emit(self) -> bool {
        match self.try_emit() {
            Ok(()) => true,
            Err(e) => {
                internal::error("EMIT", &format!("Dropped record: {e}"));
                false
            }
        }
    }
}

impl std::fmt::Debug for EventBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBuilder")
            .field("top", &self.top)
            .field("fields", &self.fields)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
