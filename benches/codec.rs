#![allow(unused)]
extern crate pdbscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use pdbscope::{
    codec::{decode_all_symbols, encode_leaf, encode_symbol, CodecContext},
    leaves::{ArgList, Leaf, Long, NumericLeaf},
    symbols::{Constant, ScopeEnd, Symbol},
    typesystem::{LazyTypeRef, TypeIndex, TypeResolver},
};
use std::hint::black_box;

/// A synthetic but representative type stream: alternating arg lists and
/// value records, each arg list referencing the record after it.
fn synthetic_type_stream(records: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for i in 0..records {
        let record = if i % 2 == 0 {
            Leaf::ArgList(ArgList {
                entries: vec![
                    LazyTypeRef::detached(TypeIndex::new(0x0075)),
                    LazyTypeRef::detached(TypeIndex::new(0x1000 + i as u32 + 1)),
                ],
            })
        } else {
            Leaf::Long(Long { value: i as i32 })
        };
        stream.extend(encode_leaf(&record).unwrap());
    }
    stream
}

fn synthetic_symbol_stream(records: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for i in 0..records {
        stream.extend(
            encode_symbol(&Symbol::Constant(Constant {
                value_type: LazyTypeRef::detached(TypeIndex::new(0x0074)),
                value: NumericLeaf::ULong(i as u32),
                name: format!("const_{i}"),
            }))
            .unwrap(),
        );
    }
    stream.extend(encode_symbol(&Symbol::End(ScopeEnd)).unwrap());
    stream
}

/// Benchmark the headers-only pre-scan plus a full decoding walk of a
/// 10k-record type stream.
fn bench_type_stream_walk(c: &mut Criterion) {
    let data = synthetic_type_stream(10_000);
    let size = data.len();

    let mut group = c.benchmark_group("type_stream");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("prescan", |b| {
        b.iter(|| {
            let resolver = TypeResolver::new(black_box(data.clone())).unwrap();
            black_box(resolver.record_count())
        });
    });
    group.bench_function("decode_all", |b| {
        let resolver = TypeResolver::new(data.clone()).unwrap();
        b.iter(|| {
            let decoded = resolver.records().filter(|r| r.is_ok()).count();
            black_box(decoded)
        });
    });
    group.finish();
}

/// Benchmark memoized resolution: every record decoded once, then served
/// from the cache on repeated lookups.
fn bench_resolution(c: &mut Criterion) {
    let data = synthetic_type_stream(10_000);

    let mut group = c.benchmark_group("resolution");
    group.bench_function("resolve_cold", |b| {
        b.iter_with_setup(
            || TypeResolver::new(data.clone()).unwrap(),
            |resolver| {
                for i in 0..resolver.record_count() {
                    let _ = black_box(resolver.resolve(TypeIndex::new(0x1000 + i as u32)));
                }
            },
        );
    });
    group.bench_function("resolve_cached", |b| {
        let resolver = TypeResolver::new(data.clone()).unwrap();
        for i in 0..resolver.record_count() {
            let _ = resolver.resolve(TypeIndex::new(0x1000 + i as u32));
        }
        b.iter(|| {
            for i in 0..resolver.record_count() {
                let _ = black_box(resolver.resolve(TypeIndex::new(0x1000 + i as u32)));
            }
        });
    });
    group.finish();
}

/// Benchmark a full decoding walk of a module symbol stream.
fn bench_symbol_stream_walk(c: &mut Criterion) {
    let data = synthetic_symbol_stream(10_000);
    let size = data.len();

    let mut group = c.benchmark_group("symbol_stream");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("decode_all", |b| {
        b.iter(|| {
            let decoded = decode_all_symbols(CodecContext::detached(), black_box(&data))
                .filter(|r| r.is_ok())
                .count();
            black_box(decoded)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_type_stream_walk,
    bench_resolution,
    bench_symbol_stream_walk
);
criterion_main!(benches);
