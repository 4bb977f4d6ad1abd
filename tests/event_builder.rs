//! Tests for record building and normalization.

mod common;

use chrono::{TimeZone, Utc};
use common::{FrozenClock, SOURCE, context_at, frozen_context_at};
use regex::Regex;
use serde_json::{Value, json};
use stashlog::event::{FIELD_SETTERS, LARGE_DATA_MARKER};
use stashlog::{ConfigPatch, ErrorDetail, FieldValue, SelfDescribing};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn fields(record: &serde_json::Map<String, Value>) -> &serde_json::Map<String, Value> {
    record["@fields"].as_object().unwrap()
}

#[test]
fn fresh_record_carries_device_source_and_timestamp() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().device("myApp"));

    let record = ctx.event().to_record();
    let f = fields(&record);

    assert_eq!(f["fromtype"], "myApp");
    assert_eq!(f["totype"], "myApp");
    assert_eq!(f["system"], "myApp");
    assert_eq!(record["@source"], SOURCE);

    let ts = record["@timestamp"].as_str().unwrap();
    let iso = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2}$").unwrap();
    assert!(iso.is_match(ts), "unexpected timestamp {ts}");
}

#[test]
fn default_timestamp_uses_clock_wall_time() {
    let tmp = TempDir::new().unwrap();
    let clock = FrozenClock::at(Instant::now());
    let ctx = frozen_context_at(&tmp.path().join("e.log"), &ConfigPatch::new(), clock);

    let record = ctx.event().to_record();
    assert_eq!(record["@timestamp"], "2024-03-01T09:15:00+08:00");
}

#[test]
fn timestamp_disabled_leaves_it_out() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().timestamp(false));

    let record = ctx.event().to_record();
    assert!(!record.contains_key("@timestamp"));
}

#[test]
fn explicit_timestamp_keeps_numeric_offset() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    let record = ctx.event().timestamp(at).to_record();
    assert_eq!(record["@timestamp"], "2024-01-02T03:04:05+00:00");
}

#[test]
fn long_field_is_capped_with_marker() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().max_length(20));
    let original = "abcdefghijklmnopqrstuvwxyz0123";

    let event = ctx.event().field("body", original);
    let stored = event.field_value("body").unwrap();

    assert_eq!(stored.chars().count(), 20);
    assert!(stored.starts_with(LARGE_DATA_MARKER));
    assert_eq!(stored, "< LARGE DATA >abcdef");
}

#[test]
fn field_at_cap_is_untouched() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().max_length(5));

    let event = ctx.event().field("k", "abcde");
    assert_eq!(event.field_value("k"), Some("abcde"));
}

#[test]
fn numbers_are_never_capped() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().max_length(5));

    let event = ctx.event().field("n", 1_234_567_890_123_i64).field("f", 2.5);
    assert_eq!(event.field_value("n"), Some("1234567890123"));
    assert_eq!(event.field_value("f"), Some("2.5"));
}

#[test]
fn whitespace_runs_collapse() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx
        .event()
        .message("disk   \n\t almost full")
        .field("detail", "x \r\n   y");

    assert_eq!(event.get("@message"), Some(&json!("disk almost full")));
    assert_eq!(event.field_value("detail"), Some("x y"));
}

#[test]
fn set_passes_non_strings_through() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().set("@count", 3).set("@meta", json!({"a": "b  c"}));
    assert_eq!(event.get("@count"), Some(&json!(3)));
    assert_eq!(event.get("@meta"), Some(&json!({"a": "b  c"})));
}

#[test]
fn mapping_field_is_json_encoded() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().result(json!({"foo": "bar", "list": [1, 2]}));
    assert_eq!(event.field_value("result"), Some(r#"{"foo":"bar","list":[1,2]}"#));
}

#[test]
fn bytes_decode_to_text() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().body(b"hello   world".to_vec());
    assert_eq!(event.field_value("body"), Some("hello world"));
}

struct Point {
    x: i32,
    y: i32,
}

impl SelfDescribing for Point {
    fn canonical_form(&self) -> String {
        format!("({}, {})", self.x, self.y)
    }
}

#[test]
fn self_describing_values_use_their_own_form() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx
        .event()
        .field("point", FieldValue::describe(&Point { x: 1, y: 2 }));
    assert_eq!(event.field_value("point"), Some("(1, 2)"));
}

#[test]
fn unserializable_value_is_dropped() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());
    let mut bad = HashMap::new();
    bad.insert((1_u8, 2_u8), 3_u8);

    let event = ctx
        .event()
        .field_serialized("bad", &bad)
        .field_serialized("good", &vec!["a", "b"]);

    assert_eq!(event.field_value("bad"), None);
    assert_eq!(event.field_value("good"), Some(r#"["a","b"]"#));
}

#[test]
fn error_from_error_value_is_named() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());
    let err = std::io::Error::other("abc");

    let event = ctx.event().error(ErrorDetail::of(&err));
    assert_eq!(event.field_value("errorMessage"), Some("Error: abc"));
    assert_eq!(event.field_value("errorType"), Some("-1"));
}

#[test]
fn error_from_text_with_code() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().error_with_code("abc", -4310);
    assert_eq!(event.field_value("errorMessage"), Some("abc"));
    assert_eq!(event.field_value("errorType"), Some("-4310"));

    let named = ctx.event().error(ErrorDetail::named("TypeError", "x is undefined"));
    assert_eq!(named.field_value("errorMessage"), Some("TypeError: x is undefined"));
}

#[test]
fn process_time_from_marker_is_floored() {
    let tmp = TempDir::new().unwrap();
    let marker = Instant::now();
    let clock = FrozenClock::at(marker + Duration::from_nanos(11_157_579));
    let ctx = frozen_context_at(&tmp.path().join("e.log"), &ConfigPatch::new(), clock);

    let event = ctx.event().process_time(marker);
    assert_eq!(event.field_value("processTime"), Some("11"));
}

#[test]
fn process_time_from_number_and_duration() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().process_time(41.99);
    assert_eq!(event.field_value("processTime"), Some("41"));

    let event = ctx.event().process_time(Duration::from_micros(1_500));
    assert_eq!(event.field_value("processTime"), Some("1"));
}

#[test]
fn process_time_without_value_is_a_no_op() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().process_time(());
    assert_eq!(event.field_value("processTime"), None);
    assert_eq!(fields(&event.to_record())["processTime"], "0");
}

#[test]
fn process_time_default_measures_builder_age_when_enabled() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().process_time(true));

    let event = ctx.event();
    std::thread::sleep(Duration::from_millis(20));
    let record = event.to_record();
    let elapsed: u64 = fields(&record)["processTime"].as_str().unwrap().parse().unwrap();
    assert!(elapsed >= 20, "elapsed {elapsed}");
}

#[test]
fn to_record_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().process_time(true));

    let event = ctx.event().kind("idem");
    let first = event.to_line().unwrap();
    std::thread::sleep(Duration::from_millis(15));
    let second = event.to_line().unwrap();
    assert_eq!(first, second);
}

#[test]
fn line_parses_back_to_record() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx
        .event()
        .kind("roundtrip")
        .tags(["a", "b"])
        .host("db-1")
        .field("attempt", 2);
    let line = event.to_line().unwrap();

    assert!(line.ends_with('\n'));
    assert_eq!(line.matches('\n').count(), 1);
    let parsed: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed, Value::Object(event.to_record()));
    assert_eq!(parsed["@tags"], json!(["a", "b"]));
    assert_eq!(parsed["@fields"]["host"], "db-1");
    assert_eq!(parsed["@fields"]["attempt"], "2");
}

#[test]
fn scenario_record_fields() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(
        &tmp.path().join("e.log"),
        &ConfigPatch::new().device("myApp").prefix(""),
    );

    let event = ctx
        .event()
        .to(25)
        .interface("interface")
        .param(json!({"foo": "bar", "abc": "baz"}))
        .result(json!({"foo": "bar"}))
        .process_time(3000);
    let record = event.to_record();
    let f = fields(&record);

    assert_eq!(f["totype"], "25");
    assert_eq!(f["fromtype"], "myApp");
    assert_eq!(f["interface"], "interface");
    assert_eq!(f["param"], "foo=bar&abc=baz");
    assert_eq!(f["result"], r#"{"foo":"bar"}"#);
    assert_eq!(f["processTime"], "3000");
}

#[test]
fn param_json_keeps_legacy_encoding() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().param_json(json!({"foo": "bar", "abc": "baz"}));
    assert_eq!(event.field_value("param"), Some(r#"{"foo":"bar","abc":"baz"}"#));
}

#[test]
fn param_query_encoding_rules() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx.event().param(json!({
        "q": "a b&c",
        "ids": [1, 2],
        "nested": {"x": 1},
        "flag": true
    }));
    assert_eq!(
        event.field_value("param"),
        Some("q=a%20b%26c&ids=1&ids=2&nested=&flag=true")
    );

    let raw = ctx.event().param("page=2&size=10");
    assert_eq!(raw.field_value("param"), Some("page=2&size=10"));
}

#[test]
fn interface_gets_prefix() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().prefix("api."));

    let event = ctx.event().interface("charge");
    assert_eq!(event.field_value("interface"), Some("api.charge"));
}

#[test]
fn generated_setters_write_their_fields() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let event = ctx
        .event()
        .to("a")
        .from("b")
        .system("c")
        .ip("d")
        .host("e")
        .method("f")
        .path("g")
        .body("h")
        .query("i")
        .result("j")
        .other("k")
        .alarm("l");

    for (i, (_, key)) in FIELD_SETTERS.iter().enumerate() {
        let expected = char::from(b'a' + u8::try_from(i).unwrap()).to_string();
        assert_eq!(event.field_value(key), Some(expected.as_str()), "field {key}");
    }
}

#[test]
fn seed_values_win_over_defaults() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().device("dev"));

    let event = ctx.event_from(json!({
        "@type": "seeded",
        "@source": "1.2.3.4",
        "@fields": {"totype": "other", "count": 3}
    }));
    let record = event.to_record();
    let f = fields(&record);

    assert_eq!(record["@source"], "1.2.3.4");
    assert_eq!(record["@type"], "seeded");
    assert_eq!(f["totype"], "other");
    assert_eq!(f["fromtype"], "dev");
    assert_eq!(f["count"], "3");
}

#[test]
fn builders_keep_config_from_construction() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new().device("before"));

    let early = ctx.event();
    ctx.configure(&ConfigPatch::new().device("after").prefix("v2/"));
    let late = ctx.event().interface("x");

    assert_eq!(early.field_value("system"), Some("before"));
    assert_eq!(late.field_value("system"), Some("after"));
    assert_eq!(late.field_value("interface"), Some("v2/x"));
    assert_eq!(early.interface("x").field_value("interface"), Some("x"));
}

#[test]
fn seeded_top_level_strings_are_collapsed() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_at(&tmp.path().join("e.log"), &ConfigPatch::new());

    let seeded = ctx.event_from(json!({"@message": "a   \n b", "@count": 2}));
    let chained = ctx.event().message("a   \n b");

    assert_eq!(seeded.get("@message"), Some(&json!("a b")));
    assert_eq!(seeded.get("@message"), chained.get("@message"));
    assert_eq!(seeded.get("@count"), Some(&json!(2)));
}
