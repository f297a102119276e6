use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mpack::{pack, pack_into, unpack, Value};

fn string_value(size: usize) -> Value<'static> {
    Value::from("a".repeat(size))
}

fn array_value(size: usize) -> Value<'static> {
    Value::Array((0..size as u64).map(|i| Value::from(i * 1_000)).collect())
}

fn record_value(entries: usize) -> Value<'static> {
    Value::Map(
        (0..entries)
            .map(|i| {
                (
                    Value::from(format!("key_{i}")),
                    Value::Array(vec![Value::from(i as i64 - 50), Value::F64(i as f64 / 3.0), Value::Nil]),
                )
            })
            .collect(),
    )
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/string");

    for size in [10, 100, 1000, 10_000].iter() {
        let value = string_value(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &value, |b, v| {
            let mut buf = Vec::with_capacity(size + 5);
            b.iter(|| {
                buf.clear();
                pack_into(black_box(v), &mut buf).unwrap();
            });
        });

        let encoded = pack(&value).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, data| {
            b.iter(|| black_box(unpack(black_box(data)).unwrap()));
        });
    }

    group.finish();
}

fn bench_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/containers");

    for size in [10, 100, 10_000].iter() {
        let array = array_value(*size);
        let encoded = pack(&array).unwrap();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("array/encode", size), &array, |b, v| {
            b.iter(|| black_box(pack(black_box(v)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("array/decode", size), &encoded, |b, data| {
            b.iter(|| black_box(unpack(black_box(data)).unwrap()));
        });

        let map = record_value(*size);
        let encoded = pack(&map).unwrap();
        group.bench_with_input(BenchmarkId::new("map/encode", size), &map, |b, v| {
            b.iter(|| black_box(pack(black_box(v)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("map/decode", size), &encoded, |b, data| {
            b.iter(|| black_box(unpack(black_box(data)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strings, bench_containers);
criterion_main!(benches);
