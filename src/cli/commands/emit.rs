//! `stashlog emit`: build one record from arguments and append it.

use crate::cli::EmitArgs;
use crate::cli::util::parse_field;
use crate::config::{Config, Mode};
use crate::context::Context;
use crate::event::EventBuilder;
use crate::internal;
use serde_json::Value;
use std::process::ExitCode;

/// `--param` accepts raw text or a JSON object.
fn param_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Applies every given argument to `event`.
#[must_use]
pub fn apply_args<'ctx>(mut event: EventBuilder<'ctx>, args: &EmitArgs) -> EventBuilder<'ctx> {
    if let Some(ref kind) = args.kind {
        event = event.kind(kind);
    }
    if let Some(ref message) = args.message {
        event = event.message(message);
    }
    if !args.tags.is_empty() {
        event = event.tags(args.tags.iter().cloned());
    }
    if let Some(ref to) = args.to {
        event = event.to(to);
    }
    if let Some(ref from) = args.from {
        event = event.from(from);
    }
    if let Some(ref interface) = args.interface {
        event = event.interface(interface);
    }
    if let Some(ref param) = args.param {
        event = event.param(param_value(param));
    }
    if let Some(ref result) = args.result {
        event = event.result(result);
    }
    for raw in &args.fields {
        match parse_field(raw) {
            Some((key, value)) => event = event.field(key, value),
            None => internal::warn("CLI", &format!("Ignoring malformed field: {raw}")),
        }
    }
    if let Some(ref error) = args.error {
        event = match args.code {
            Some(code) => event.error_with_code(error.as_str(), code),
            None => event.error(error.as_str()),
        };
    }
    if let Some(ms) = args.process_time {
        event = event.process_time(ms);
    }
    event
}

/// Handles `stashlog emit`.
#[must_use]
pub fn cmd_emit(config: &Config, args: &EmitArgs) -> ExitCode {
    let mut builder = Context::builder().config(config.sink_config(Mode::from_env()));
    if let Some(ref file) = args.file {
        builder = builder.file_path(file);
    }
    if let Some(ref device) = args.device {
        builder = builder.device(device);
    }
    let ctx = builder.build();

    let event = apply_args(ctx.event(), args);
    if event.emit() {
        internal::debug("CLI", &format!("Appended to {}", ctx.sink().path().display()));
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
