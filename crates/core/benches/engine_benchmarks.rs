use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use valsem_core::{Value, ValueObject, equals, format, hash_code};

/// Record with a payload large enough to hit the sampled hash path.
struct Blob {
    id: i64,
    payload: Value,
    labels: Value,
}

impl Blob {
    fn new(id: i64, payload_len: usize) -> Self {
        Self {
            id,
            payload: Value::bytes(vec![(id % 251) as u8; payload_len]),
            labels: Value::set([Value::from("alpha"), Value::from("beta"), Value::from(id)]),
        }
    }
}

impl ValueObject for Blob {
    fn identity_values(&self) -> Vec<Value> {
        vec![self.id.into(), self.payload.clone(), self.labels.clone()]
    }
}

fn blobs(count: usize, payload_len: usize) -> Value {
    Value::list((0..count).map(|i| Value::object(Blob::new(i as i64, payload_len))))
}

fn bench_equality(c: &mut Criterion) {
    let mut group = c.benchmark_group("equals");
    for count in [10usize, 100, 1000] {
        let left = blobs(count, 4096);
        let right = blobs(count, 4096);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("blobs", count), &count, |b, _| {
            b.iter(|| equals(black_box(&left), black_box(&right)))
        });
    }
    group.finish();
}

fn bench_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_code");
    for payload_len in [512usize, 4096, 1 << 16] {
        let value = blobs(100, payload_len);
        group.throughput(Throughput::Bytes((100 * payload_len) as u64));
        group.bench_with_input(BenchmarkId::new("payload", payload_len), &payload_len, |b, _| {
            b.iter(|| hash_code(black_box(&value)))
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let value = blobs(100, 16);
    c.bench_function("format/100_blobs", |b| b.iter(|| format(black_box(&value))));
}

criterion_group!(benches, bench_equality, bench_hashing, bench_format);
criterion_main!(benches);
