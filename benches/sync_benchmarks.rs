//! Hybrid adapter benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matemagica_sync::store::MemoryStore;
use matemagica_sync::sync::{HybridStore, SyncContext};
use serde_json::json;
use std::sync::Arc;

fn benchmark_save_local(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let hybrid = HybridStore::new(Arc::new(MemoryStore::new()));
    let ctx = SyncContext::local_only();
    let payload = json!({"exercise": "7+5", "answer": 12, "correct": true});

    c.bench_function("save_local_only", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(hybrid.save(&ctx, "exercise_sessions", payload.clone(), None).await)
            })
        })
    });
}

fn benchmark_load_local(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let hybrid = HybridStore::new(Arc::new(MemoryStore::new()));
    let ctx = SyncContext::local_only();

    runtime.block_on(async {
        hybrid.save(&ctx, "studentData", json!({"name": "Ana"}), None).await;
    });

    c.bench_function("load_local_only", |b| {
        b.iter(|| {
            runtime.block_on(async { black_box(hybrid.load(&ctx, "studentData", None).await) })
        })
    });
}

criterion_group!(benches, benchmark_save_local, benchmark_load_local);
criterion_main!(benches);
