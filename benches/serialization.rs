#![allow(unused)]
extern crate serinfo;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serinfo::prelude::*;
use std::{hint::black_box, sync::Arc};

fn populated(count: usize) -> SerializationInfo {
    let mut info = SerializationInfo::new(
        CilPrimitiveKind::Object.type_ref(),
        Arc::new(DefaultConverter),
    );
    for i in 0..count {
        info.add(format!("member{i}"), i as i32).unwrap();
    }
    info
}

/// Benchmark populating a store from its default capacity
///
/// Every run starts at capacity 4, so this includes all doubling steps.
fn bench_populate(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    for count in [16usize, 256, 4096] {
        let names: Vec<String> = (0..count).map(|i| format!("member{i}")).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &names, |b, names| {
            b.iter(|| {
                let mut info = SerializationInfo::new(
                    CilPrimitiveKind::Object.type_ref(),
                    Arc::new(DefaultConverter),
                );
                for (i, name) in names.iter().enumerate() {
                    info.add(name.as_str(), i as i32).unwrap();
                }
                black_box(info)
            });
        });
    }
    group.finish();
}

/// Benchmark typed reads: exact type, assignable type and converter fallback
fn bench_typed_reads(c: &mut Criterion) {
    let info = populated(1024);
    let int32 = CilPrimitiveKind::I4.type_ref();
    let object = CilPrimitiveKind::Object.type_ref();
    let string = CilPrimitiveKind::String.type_ref();

    let mut group = c.benchmark_group("typed_reads");
    group.bench_function("get_int32_fast_path", |b| {
        b.iter(|| black_box(info.get_int32(black_box("member512")).unwrap()));
    });
    group.bench_function("get_int64_converted", |b| {
        b.iter(|| black_box(info.get_int64(black_box("member512")).unwrap()));
    });
    group.bench_function("get_value_identity", |b| {
        b.iter(|| black_box(info.get_value(black_box("member512"), &int32).unwrap()));
    });
    group.bench_function("get_value_assignable", |b| {
        b.iter(|| black_box(info.get_value(black_box("member512"), &object).unwrap()));
    });
    group.bench_function("get_value_to_string", |b| {
        b.iter(|| black_box(info.get_value(black_box("member512"), &string).unwrap()));
    });
    group.bench_function("try_get_value_missing", |b| {
        b.iter(|| black_box(info.try_get_value(black_box("absent"), &int32).unwrap()));
    });
    group.finish();
}

/// Benchmark a full enumeration in insertion order
fn bench_iterate(c: &mut Criterion) {
    let info = populated(4096);

    let mut group = c.benchmark_group("iterate");
    group.throughput(Throughput::Elements(info.member_count() as u64));
    group.bench_function("iter", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for entry in &info {
                total += entry.name().len();
            }
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_populate, bench_typed_reads, bench_iterate);
criterion_main!(benches);
