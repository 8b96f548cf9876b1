//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Counting Bloom filter (add / delete / contains over atomic counters)
//! - Hash slot functions
//! - Parameter selection
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod counting_bloom;
pub mod hash_functions;
pub mod parameters;

pub use config::{FilterConfig, FilterConfigBuilder};
pub use counting_bloom::{
    CountingBloomFilter, DEFAULT_CAPACITY, DEFAULT_ERROR_RATE, MAX_COUNTER, MAX_DIMENSION,
    MAX_HASH_COUNT,
};
pub use hash_functions::{FilterKey, HashSlotSet, Salt, SlotHasher, DIGEST_LEN, SALT_LEN};
pub use parameters::{calculate_fpr, select_parameters, FilterParams, MAX_HASH_CANDIDATES};
