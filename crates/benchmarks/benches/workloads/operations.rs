//! add / contains / delete throughput.

use std::hint::black_box;

use counting_bloom::CountingBloomFilter;
use counting_bloom_benchmarks::utils::{generate_elements, generate_shared_prefix_elements};
use criterion::{BenchmarkId, Criterion, Throughput};

const ELEMENT_LEN: usize = 200;

pub fn add_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/add");

    // add is O(k) digests: vary k at fixed m
    for k in [3, 7, 13] {
        group.bench_with_input(BenchmarkId::new("single_add", k), &k, |b, &k| {
            let filter: CountingBloomFilter<Vec<u8>> =
                CountingBloomFilter::with_dimensions(100_000, k).unwrap();
            let element = generate_elements(1, ELEMENT_LEN, 1).remove(0);
            b.iter(|| filter.add(black_box(&element)));
        });
    }

    let elements = generate_elements(1_000, ELEMENT_LEN, 2);
    group.throughput(Throughput::Elements(elements.len() as u64));
    group.bench_function("bulk_add_1000", |b| {
        b.iter(|| {
            let filter = CountingBloomFilter::with_capacity(1_000, 0.01).unwrap();
            for element in &elements {
                filter.add(black_box(element));
            }
            black_box(filter.nonzero_counters())
        });
    });

    let shared_prefix = generate_shared_prefix_elements(1_000, 3);
    group.bench_function("bulk_add_shared_prefix_1000", |b| {
        b.iter(|| {
            let filter = CountingBloomFilter::with_capacity(1_000, 0.01).unwrap();
            for element in &shared_prefix {
                filter.add(black_box(element));
            }
            black_box(filter.nonzero_counters())
        });
    });

    group.finish();
}

pub fn contains_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/contains");

    let present = generate_elements(1_000, ELEMENT_LEN, 4);
    let absent = generate_elements(10_000, ELEMENT_LEN, 5);
    let filter = CountingBloomFilter::with_capacity(present.len(), 0.01).unwrap();
    for element in &present {
        filter.add(element);
    }

    group.bench_function("contains_existing_element", |b| {
        let target = &present[500];
        b.iter(|| black_box(filter.contains(black_box(target))))
    });

    group.bench_function("contains_non_existing_element", |b| {
        let target = &absent[0];
        b.iter(|| black_box(filter.contains(black_box(target))))
    });

    group.throughput(Throughput::Elements(absent.len() as u64));
    group.bench_function("bulk_contains_non_existing_10000", |b| {
        b.iter(|| black_box(absent.iter().filter(|e| filter.contains(e)).count()))
    });

    group.finish();
}

pub fn delete_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/delete");

    let elements = generate_elements(1_000, ELEMENT_LEN, 6);
    group.throughput(Throughput::Elements(elements.len() as u64));
    group.bench_function("add_then_delete_1000", |b| {
        let filter = CountingBloomFilter::with_capacity(elements.len(), 0.01).unwrap();
        b.iter(|| {
            for element in &elements {
                filter.add(element);
            }
            for element in &elements {
                filter.delete(black_box(element));
            }
            black_box(filter.nonzero_counters())
        });
    });

    group.bench_function("delete_on_empty_filter", |b| {
        let filter: CountingBloomFilter<Vec<u8>> = CountingBloomFilter::new();
        let element = &elements[0];
        b.iter(|| filter.delete(black_box(element)));
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    add_operations(c);
    contains_operations(c);
    delete_operations(c);
}
