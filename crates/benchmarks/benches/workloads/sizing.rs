//! Parameter selection and persisted-form encode / decode.

use std::hint::black_box;

use counting_bloom::{select_parameters, CountingBloomFilter};
use counting_bloom_benchmarks::utils::generate_elements;
use criterion::{BenchmarkId, Criterion, Throughput};

pub fn parameter_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/parameters");

    for (capacity, error_rate) in [(1_024, 0.01), (50_000, 0.0001), (1_000_000, 0.001)] {
        group.bench_with_input(
            BenchmarkId::new("select_parameters", format!("{capacity}@{error_rate}")),
            &(capacity, error_rate),
            |b, &(n, p)| b.iter(|| select_parameters(black_box(n), black_box(p))),
        );
    }

    group.finish();
}

pub fn encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/codec");

    for capacity in [1_000, 100_000] {
        let filter: CountingBloomFilter<Vec<u8>> =
            CountingBloomFilter::with_capacity(capacity, 0.01).unwrap();
        for element in generate_elements(capacity, 32, 7) {
            filter.add(&element);
        }
        let bytes = filter.to_bytes();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("to_bytes", capacity), &filter, |b, f| {
            b.iter(|| black_box(f.to_bytes()))
        });
        group.bench_with_input(BenchmarkId::new("from_bytes", capacity), &bytes, |b, bytes| {
            b.iter(|| CountingBloomFilter::<Vec<u8>>::from_bytes(black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    parameter_selection(c);
    encoding(c);
}
