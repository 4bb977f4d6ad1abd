//! Tests for config parsing and layering.

use stashlog::config::{DEFAULT_DEVICE, DEFAULT_MAX_LENGTH, PRODUCTION_PATH};
use stashlog::{Config, ConfigPatch, Error, Level, Mode, SinkConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn empty_config_is_valid() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.sink, ConfigPatch::default());
    assert!(config.diagnostics.level.is_none());
}

#[test]
fn snake_case_keys() {
    let config = Config::parse(
        r#"
[sink]
file_path = "/tmp/stashlog/a.log"
device = "gateway"
prefix = "api/"
max_length = 128
timestamp = false
process_time = true
echo = true
"#,
    )
    .unwrap();

    let sink = config.sink_config(Mode::Development);
    assert_eq!(sink.file_path, PathBuf::from("/tmp/stashlog/a.log"));
    assert_eq!(sink.device, "gateway");
    assert_eq!(sink.prefix, "api/");
    assert_eq!(sink.max_length, 128);
    assert!(!sink.timestamp);
    assert!(sink.process_time);
    assert!(sink.echo);
}

#[test]
fn camel_case_aliases() {
    let config = Config::parse(
        r#"
[sink]
filePath = "/tmp/b.log"
maxlength = 64
processTime = true
"#,
    )
    .unwrap();

    assert_eq!(config.sink.file_path, Some(PathBuf::from("/tmp/b.log")));
    assert_eq!(config.sink.max_length, Some(64));
    assert_eq!(config.sink.process_time, Some(true));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = Config::parse("[sink\ndevice = ").unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let err = Config::parse("[sink]\nmax_length = \"big\"").unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn missing_file_gives_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
    assert_eq!(config.sink, ConfigPatch::default());
}

#[test]
fn load_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("stashlog.toml");
    fs::write(&path, "[sink]\ndevice = \"fromfile\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.sink.device.as_deref(), Some("fromfile"));
}

#[test]
fn mode_defaults() {
    let prod = SinkConfig::for_mode(Mode::Production);
    assert_eq!(prod.file_path, PathBuf::from(PRODUCTION_PATH));
    assert_eq!(prod.device, DEFAULT_DEVICE);
    assert_eq!(prod.max_length, DEFAULT_MAX_LENGTH);
    assert!(prod.timestamp);
    assert!(!prod.process_time);
    assert!(!prod.echo);

    let dev = SinkConfig::for_mode(Mode::Development);
    assert_ne!(dev.file_path, prod.file_path);
    assert!(dev.file_path.ends_with("log/production.log"));
}

#[test]
fn apply_keeps_unset_options() {
    let mut sink = SinkConfig::for_mode(Mode::Development);
    sink.apply(&ConfigPatch::new().device("a").prefix("x")).unwrap();
    sink.apply(&ConfigPatch::new().device("b")).unwrap();

    assert_eq!(sink.device, "b");
    assert_eq!(sink.prefix, "x");
}

#[test]
fn zero_max_length_is_rejected() {
    let mut sink = SinkConfig::for_mode(Mode::Development);
    let err = sink
        .apply(&ConfigPatch::new().max_length(0).device("still"))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfig(_)));
    assert_eq!(sink.max_length, DEFAULT_MAX_LENGTH);
    assert_eq!(sink.device, "still");
}

#[test]
fn zero_max_length_in_file_keeps_default() {
    let config = Config::parse("[sink]\nmaxlength = 0\n").unwrap();
    assert_eq!(config.sink_config(Mode::Development).max_length, DEFAULT_MAX_LENGTH);
}

#[test]
fn diagnostics_level() {
    let config = Config::parse("[diagnostics]\nlevel = \"debug\"\n").unwrap();
    assert_eq!(config.diagnostics_level(), Some(Level::Debug));

    let config = Config::parse("[diagnostics]\nlevel = \"loud\"\n").unwrap();
    assert_eq!(config.diagnostics_level(), None);

    assert_eq!(Config::default().diagnostics_level(), None);
}

#[test]
fn config_path_is_under_stashlog_dir() {
    let path = Config::get_config_path().unwrap();
    assert!(path.ends_with("stashlog/stashlog.toml"));
}
