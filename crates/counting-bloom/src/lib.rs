//! # Counting Bloom
//!
//! A thread-safe counting Bloom filter: approximate set membership with
//! insertion, deletion and query, trading a bounded false positive rate
//! for compact storage.
//!
//! ## Layout
//!
//! - **Domain Layer** (`domain/`): pure filter logic
//!   - `CountingBloomFilter`: saturating atomic counters, add/delete/contains
//!   - `HashSlotSet`: `k` salted SHA-1 slot functions
//!   - `select_parameters`: optimal `(m, k)` for a capacity and error rate
//!   - `FilterConfig`: sizing inputs with validation and env loading
//! - **Codec** (`codec`): persisted binary layout and serde surface
//! - **Metrics** (`metrics`): operation counters for callers that time work
//!
//! ## Invariants
//!
//! - No false negatives: after `add(x)`, `contains(x)` is true unless `x`
//!   (or an element sharing all of its slots) was deleted
//! - Counters never exceed [`MAX_COUNTER`] and never go below zero
//! - `(m, k)` never change after construction
//!
//! ## Usage Example
//!
//! ```
//! use counting_bloom::CountingBloomFilter;
//!
//! let filter = CountingBloomFilter::with_capacity(1_000, 0.01)?;
//! filter.add("alice");
//! assert!(filter.contains("alice"));
//!
//! filter.delete("alice");
//! assert!(!filter.contains("alice"));
//! # Ok::<(), counting_bloom::FilterError>(())
//! ```
//!
//! ## Sharing Across Threads
//!
//! ```
//! use std::sync::Arc;
//! use counting_bloom::CountingBloomFilter;
//!
//! let filter: Arc<CountingBloomFilter<u64>> = Arc::new(CountingBloomFilter::new());
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let filter = Arc::clone(&filter);
//!         std::thread::spawn(move || filter.add(&t))
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert!((0..4u64).all(|t| filter.contains(&t)));
//! ```

pub mod codec;
pub mod domain;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use codec::FilterSnapshot;
pub use domain::{
    calculate_fpr, select_parameters, CountingBloomFilter, FilterConfig, FilterConfigBuilder,
    FilterKey, FilterParams, HashSlotSet, DEFAULT_CAPACITY, DEFAULT_ERROR_RATE, MAX_COUNTER,
    MAX_HASH_COUNT,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
