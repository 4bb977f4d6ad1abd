//! Field value normalization: whitespace collapsing, length capping,
//! numeric rendering and query-string encoding.

use super::value::FieldValue;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

/// Leads every truncated field value.
pub const LARGE_DATA_MARKER: &str = "< LARGE DATA >";

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Collapses every run of whitespace into a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").into_owned()
}

/// Caps `text` at `max` characters. An over-long value becomes the marker
/// followed by as many leading characters of the original as fit.
#[must_use]
pub fn truncate(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    LARGE_DATA_MARKER.chars().chain(text.chars()).take(max).collect()
}

/// Integral values render without a fractional part (`3000`, not `3000.0`).
#[must_use]
pub fn number_text(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => number.to_string(),
    }
}

/// Floors a millisecond reading into a field value.
#[must_use]
pub fn floor_millis(ms: f64) -> FieldValue {
    let floored = ms.floor();
    Number::from_f64(floored).map_or_else(|| FieldValue::Text(ms.to_string()), FieldValue::Number)
}

/// Renders a field value as stored text.
///
/// # Errors
/// Returns the serializer error for JSON values that cannot be encoded.
pub fn normalize(value: FieldValue, max: usize) -> Result<String, crate::Error> {
    let text = match value {
        FieldValue::Number(number) => return Ok(number_text(&number)),
        FieldValue::Text(text) | FieldValue::Described(text) => text,
        FieldValue::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        FieldValue::Json(value) => serde_json::to_string(&value)?,
    };
    Ok(truncate(collapse_whitespace(&text), max))
}

fn query_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Encodes a flat mapping as `k=v&k2=v2`. Array values repeat their key;
/// nested objects and nulls encode as an empty value.
#[must_use]
pub fn query_encode(map: &Map<String, Value>) -> String {
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let key = urlencoding::encode(key);
        if let Value::Array(items) = value {
            for item in items {
                pairs.push(format!("{key}={}", urlencoding::encode(&query_scalar(item))));
            }
        } else {
            pairs.push(format!("{key}={}", urlencoding::encode(&query_scalar(value))));
        }
    }
    pairs.join("&")
}
