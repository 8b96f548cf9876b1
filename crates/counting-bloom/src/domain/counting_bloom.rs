//! # Counting Bloom Filter
//!
//! Approximate membership with deletion: bits are replaced by counters.
//!
//! - Add: increment the counter at each of the element's `k` slots
//! - Delete: decrement the counter at each slot, floored at zero
//! - Contains: true if every slot counter is non-zero
//!
//! ## Concurrency
//!
//! Counters are `AtomicU32`. Every increment or decrement is its own
//! compare-and-swap on one counter, so updates to the same index serialize
//! and updates to different indices never contend. There is no lock over an
//! element's whole slot set: a concurrent `contains` may see part of an `add`
//! that is still in flight. Callers needing all-or-nothing visibility must
//! synchronize externally.
//!
//! Reads are single atomic loads. A counter can never be observed torn, so
//! queries never block writers or each other.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, trace};

use super::config::FilterConfig;
use super::hash_functions::{FilterKey, HashSlotSet};
use super::parameters::{calculate_fpr, optimal_parameters, select_parameters};
use crate::error::FilterError;

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Error rate used when none is given (1%).
pub const DEFAULT_ERROR_RATE: f64 = 0.01;

/// Counters saturate here so each fits a signed 32-bit persisted value.
pub const MAX_COUNTER: u32 = i32::MAX as u32;

/// Upper bound for `m`.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// Upper bound for `k`. Every slot is a SHA-1 digest per operation, and the
/// selector never picks more than 99.
pub const MAX_HASH_COUNT: usize = 1024;

/// Counting Bloom filter over elements of type `T`.
///
/// All operations take `&self`; share the filter across threads by
/// reference or `Arc`.
pub struct CountingBloomFilter<T: ?Sized> {
    /// One saturating counter per slot (m)
    counters: Box<[AtomicU32]>,
    /// Slot functions (k)
    slots: HashSlotSet,
    _element: PhantomData<fn(&T)>,
}

impl<T: ?Sized> CountingBloomFilter<T> {
    /// Filter sized for 1024 elements at a 1% error rate.
    pub fn new() -> Self {
        let params = optimal_parameters(DEFAULT_CAPACITY, DEFAULT_ERROR_RATE);
        Self::zeroed(params.size, params.hash_count)
    }

    /// Filter sized for 1024 elements at `error_rate`.
    pub fn with_error_rate(error_rate: f64) -> Result<Self, FilterError> {
        Self::with_capacity(DEFAULT_CAPACITY, error_rate)
    }

    /// Filter with the smallest array meeting `error_rate` at `capacity` elements.
    pub fn with_capacity(capacity: usize, error_rate: f64) -> Result<Self, FilterError> {
        let params = select_parameters(capacity, error_rate)?;
        validate_dimensions(params.size, params.hash_count)?;

        debug!(
            capacity,
            error_rate,
            size = params.size,
            hash_count = params.hash_count,
            expected_fpr = params.expected_fpr,
            "Counting Bloom filter created"
        );

        Ok(Self::zeroed(params.size, params.hash_count))
    }

    /// Filter with an explicit array size `m` and hash count `k`.
    pub fn with_dimensions(m: usize, k: usize) -> Result<Self, FilterError> {
        validate_dimensions(m, k)?;
        debug!(size = m, hash_count = k, "Counting Bloom filter created");
        Ok(Self::zeroed(m, k))
    }

    /// Filter sized from a validated configuration.
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Self::with_capacity(config.capacity, config.error_rate)
    }

    fn zeroed(m: usize, k: usize) -> Self {
        Self::from_parts(vec![0; m], k)
    }

    /// Build around an existing counter array. Dimensions must already be valid.
    pub(crate) fn from_parts(counters: Vec<u32>, k: usize) -> Self {
        Self {
            counters: counters.into_iter().map(AtomicU32::new).collect(),
            slots: HashSlotSet::new(k),
            _element: PhantomData,
        }
    }

    /// Array length (m).
    pub fn size(&self) -> usize {
        self.counters.len()
    }

    /// Number of slot functions (k).
    pub fn hash_count(&self) -> usize {
        self.slots.len()
    }

    /// Snapshot of the counter array in index order.
    ///
    /// Not atomic across counters while writers are active.
    pub fn counters(&self) -> Vec<u32> {
        self.counters
            .iter()
            .map(|c| c.load(Ordering::Acquire))
            .collect()
    }

    pub fn counter(&self, index: usize) -> Option<u32> {
        self.counters.get(index).map(|c| c.load(Ordering::Acquire))
    }

    pub fn nonzero_counters(&self) -> usize {
        self.counters
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) > 0)
            .count()
    }

    /// Theoretical false positive rate after `n` insertions.
    pub fn estimated_fpr(&self, n: usize) -> f64 {
        calculate_fpr(self.size(), n, self.hash_count())
    }
}

impl<T: FilterKey + ?Sized> CountingBloomFilter<T> {
    /// Add an element (increment its counters, saturating at [`MAX_COUNTER`]).
    ///
    /// After `add` returns, `contains(element)` is true until the element is
    /// deleted (or a co-located element is over-deleted).
    pub fn add(&self, element: &T) {
        let key = element.key_bytes();
        for index in self.slots.slots(&key, self.size()) {
            let saturated = self.counters[index]
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                    (c < MAX_COUNTER).then(|| c + 1)
                })
                .is_err();
            if saturated {
                trace!(index, "counter saturated");
            }
        }
    }

    /// Delete an element (decrement its counters, floored at zero).
    ///
    /// **Note**: deleting an element that was never added is well-defined
    /// but can cause false negatives for elements sharing its slots.
    pub fn delete(&self, element: &T) {
        let key = element.key_bytes();
        for index in self.slots.slots(&key, self.size()) {
            let floored = self.counters[index]
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                    (c > 0).then(|| c - 1)
                })
                .is_err();
            if floored {
                trace!(index, "delete on empty counter");
            }
        }
    }

    /// Check if the element might be in the filter.
    ///
    /// - `true`: possibly present (false positives bounded by the error rate)
    /// - `false`: definitely absent
    pub fn contains(&self, element: &T) -> bool {
        let key = element.key_bytes();
        // Bound to a local so the slot iterator drops before `key`.
        let found = self
            .slots
            .slots(&key, self.size())
            .all(|index| self.counters[index].load(Ordering::Acquire) > 0);
        found
    }

    /// The element's `k` counter indices in slot order.
    pub fn indices(&self, element: &T) -> Vec<usize> {
        let key = element.key_bytes();
        self.slots.slots(&key, self.size()).collect()
    }
}

/// Reject `m` outside `[1, MAX_DIMENSION]` or `k` outside `[1, MAX_HASH_COUNT]`.
pub(crate) fn validate_dimensions(m: usize, k: usize) -> Result<(), FilterError> {
    if m == 0 || m > MAX_DIMENSION {
        return Err(FilterError::invalid(
            "size",
            format!("{m} is not in [1, {MAX_DIMENSION}]"),
        ));
    }
    if k == 0 || k > MAX_HASH_COUNT {
        return Err(FilterError::invalid(
            "hash_count",
            format!("{k} is not in [1, {MAX_HASH_COUNT}]"),
        ));
    }
    Ok(())
}

impl<T: ?Sized> Default for CountingBloomFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for CountingBloomFilter<T> {
    fn clone(&self) -> Self {
        Self::from_parts(self.counters(), self.hash_count())
    }
}

/// Equal iff `k`, the array length `m` and every counter match. Slot
/// functions are not compared.
impl<T: ?Sized> PartialEq for CountingBloomFilter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_count() == other.hash_count()
            && self.size() == other.size()
            && self
                .counters
                .iter()
                .zip(other.counters.iter())
                .all(|(a, b)| a.load(Ordering::Acquire) == b.load(Ordering::Acquire))
    }
}

impl<T: ?Sized> Eq for CountingBloomFilter<T> {}

impl<T: ?Sized> Hash for CountingBloomFilter<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_count().hash(state);
        self.size().hash(state);
        for counter in self.counters.iter() {
            counter.load(Ordering::Acquire).hash(state);
        }
    }
}

impl<T: ?Sized> fmt::Debug for CountingBloomFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingBloomFilter")
            .field("size", &self.size())
            .field("hash_count", &self.hash_count())
            .field("nonzero_counters", &self.nonzero_counters())
            .finish()
    }
}
