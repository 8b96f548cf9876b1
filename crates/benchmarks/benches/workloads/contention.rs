//! Many threads on one shared filter.
//!
//! Counters are independent atomics, so throughput should grow with
//! threads until the counter cache lines start bouncing.

use std::hint::black_box;
use std::thread;

use counting_bloom::CountingBloomFilter;
use counting_bloom_benchmarks::utils::generate_elements;
use criterion::{BenchmarkId, Criterion, Throughput};

const OPS_PER_THREAD: usize = 500;

pub fn concurrent_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/contention");

    for threads in [1, 2, 4, 8] {
        let batches: Vec<Vec<Vec<u8>>> = (0..threads)
            .map(|t| generate_elements(OPS_PER_THREAD, 64, 100 + t as u64))
            .collect();

        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(
            BenchmarkId::new("concurrent_add", threads),
            &batches,
            |b, batches| {
                b.iter(|| {
                    let filter: CountingBloomFilter<Vec<u8>> =
                        CountingBloomFilter::with_capacity(threads * OPS_PER_THREAD, 0.01)
                            .unwrap();
                    thread::scope(|s| {
                        for batch in batches {
                            let filter = &filter;
                            s.spawn(move || {
                                for element in batch {
                                    filter.add(element);
                                }
                            });
                        }
                    });
                    black_box(filter.nonzero_counters())
                });
            },
        );
    }

    group.finish();
}

pub fn hot_element(c: &mut Criterion) {
    let mut group = c.benchmark_group("cbf/contention");

    // Every thread hits the same k counters
    let element = generate_elements(1, 64, 42).remove(0);
    for threads in [1, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD * 2) as u64));
        group.bench_with_input(BenchmarkId::new("hot_add_delete", threads), &threads, |b, &threads| {
            let filter: CountingBloomFilter<Vec<u8>> = CountingBloomFilter::new();
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..OPS_PER_THREAD {
                                filter.add(&element);
                                filter.delete(&element);
                            }
                        });
                    }
                });
                black_box(filter.contains(&element))
            });
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    concurrent_add(c);
    hot_element(c);
}
