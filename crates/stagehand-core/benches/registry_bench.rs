//! Criterion benchmarks for the object registry service.
//!
//! Three benchmark groups:
//! - `registration`: bulk registration into an empty session
//! - `snapshot`: list pulls from a populated session
//! - `selection`: id-based selection churn and sweeps over dead objects

use criterion::{Criterion, criterion_group, criterion_main};
use stagehand_core::id::ObjectId;
use stagehand_core::service::ObjectManager;
use stagehand_core::test_utils::*;

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    group.sample_size(50);

    group.bench_function("register_1000", |b| {
        b.iter_batched(
            || {
                let mut host = MockHost::new();
                let handles: Vec<MockHandle> = (0..1000)
                    .map(|index| host.add_named(&format!("Object{index:03}")))
                    .collect();
                (host, handles, ObjectManager::default())
            },
            |(host, handles, mut manager)| {
                for handle in handles {
                    manager.register_object(&host, handle);
                }
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    group.sample_size(50);

    let (host, mut manager) = build_session(1000);

    group.bench_function("object_list_1000", |b| {
        b.iter(|| manager.object_list(&host));
    });

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.sample_size(50);

    let (host, mut manager) = build_session(1000);

    group.bench_function("select_churn_1000", |b| {
        let mut next = 0u32;
        b.iter(|| {
            next = if next >= 1000 { 1 } else { next + 1 };
            manager.select_by_id(&host, ObjectId(next));
        });
    });

    group.bench_function("sweep_half_dead_1000", |b| {
        b.iter_batched(
            || {
                let (mut host, manager) = build_session(1000);
                for handle in host.handles().into_iter().step_by(2) {
                    host.kill(handle);
                }
                (host, manager)
            },
            |(host, mut manager)| {
                manager.sweep_dead(&host);
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_registration, bench_snapshot, bench_selection);
criterion_main!(benches);
