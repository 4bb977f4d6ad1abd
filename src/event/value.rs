//! Input types accepted by the builder's field setters.

use serde_json::{Map, Number, Value};
use std::fmt;
use std::time::{Duration, Instant};

/// Values that know their own log representation.
///
/// Wrap with [`FieldValue::describe`] to store the canonical form instead of
/// a structural JSON encoding.
pub trait SelfDescribing {
    fn canonical_form(&self) -> String;
}

/// A field value before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Whitespace-collapsed and length-capped.
    Text(String),
    /// Stored as numeric text, never capped.
    Number(Number),
    /// Decoded as lossy UTF-8, then treated as text.
    Bytes(Vec<u8>),
    /// Objects and arrays; stored as compact JSON text.
    Json(Value),
    /// Output of [`SelfDescribing::canonical_form`].
    Described(String),
}

impl FieldValue {
    /// Uses the value's own representation.
    #[must_use]
    pub fn describe<T: SelfDescribing + ?Sized>(value: &T) -> Self {
        Self::Described(value.canonical_form())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! integer_field_values {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

integer_field_values!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Map<String, Value>> for FieldValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Json(Value::Object(value))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Null => Self::Text("null".to_string()),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Json(other),
        }
    }
}

/// Input to [`error`](super::EventBuilder::error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Stored verbatim.
    Message(String),
    /// Stored as `name: message`.
    Named { name: String, message: String },
}

impl ErrorDetail {
    #[must_use]
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Names the error after its type (`std::io::Error` becomes `Error`).
    #[must_use]
    pub fn of<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::Named {
            name: short_type_name(std::any::type_name::<E>()).to_string(),
            message: err.to_string(),
        }
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches("dyn ");
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Named { name, message } => write!(f, "{name}: {message}"),
        }
    }
}

impl From<&str> for ErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<String> for ErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

/// Input to [`process_time`](super::EventBuilder::process_time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessTime {
    /// Leaves the field untouched; built from `()`.
    Unset,
    /// Elapsed time since this marker, read when the setter runs.
    Since(Instant),
    /// Explicit millisecond count.
    Millis(f64),
}

impl From<()> for ProcessTime {
    fn from((): ()) -> Self {
        Self::Unset
    }
}

impl From<Instant> for ProcessTime {
    fn from(marker: Instant) -> Self {
        Self::Since(marker)
    }
}

impl From<Duration> for ProcessTime {
    fn from(elapsed: Duration) -> Self {
        Self::Millis(elapsed.as_secs_f64() * 1000.0)
    }
}

impl From<f64> for ProcessTime {
    fn from(ms: f64) -> Self {
        Self::Millis(ms)
    }
}

impl From<u32> for ProcessTime {
    fn from(ms: u32) -> Self {
        Self::Millis(f64::from(ms))
    }
}

impl From<i32> for ProcessTime {
    fn from(ms: i32) -> Self {
        Self::Millis(f64::from(ms))
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<u64> for ProcessTime {
    fn from(ms: u64) -> Self {
        Self::Millis(ms as f64)
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<i64> for ProcessTime {
    fn from(ms: i64) -> Self {
        Self::Millis(ms as f64)
    }
}
