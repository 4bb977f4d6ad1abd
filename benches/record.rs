use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use stashlog::{Context, FixedAddress, Mode, SinkConfig};
use std::hint::black_box;
use tempfile::TempDir;

fn make_context(tmp: &TempDir) -> Context {
    Context::builder()
        .config(SinkConfig::for_mode(Mode::Development))
        .file_path(tmp.path().join("bench.log"))
        .address(FixedAddress::new("10.0.0.1"))
        .build()
}

fn bench_to_line(c: &mut Criterion) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let ctx = make_context(&tmp);

    c.bench_function("EventBuilder::to_line", |b| {
        b.iter(|| {
            let event = ctx
                .event()
                .kind("request")
                .interface("/orders")
                .param(json!({"page": 2, "q": "benchmark query"}))
                .result(json!({"ok": true, "items": [1, 2, 3]}))
                .process_time(12.5);
            black_box(event.to_line().expect("serialize failed"))
        });
    });
}

fn bench_emit(c: &mut Criterion) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let ctx = make_context(&tmp);

    c.bench_function("EventBuilder::emit", |b| {
        b.iter(|| {
            let ok = ctx
                .event()
                .kind("request")
                .body(black_box("benchmark   body with    whitespace"))
                .emit();
            black_box(ok)
        });
    });

    ctx.flush().expect("flush failed");
}

fn bench_long_field(c: &mut Criterion) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let ctx = make_context(&tmp);
    let payload = "x ".repeat(10_000);

    c.bench_function("EventBuilder::field (truncated)", |b| {
        b.iter(|| black_box(ctx.event().body(black_box(payload.as_str()))));
    });
}

criterion_group!(benches, bench_to_line, bench_emit, bench_long_field);
criterion_main!(benches);
