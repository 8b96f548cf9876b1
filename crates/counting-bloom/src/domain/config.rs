//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use counting_bloom::{CountingBloomFilter, FilterConfigBuilder};
//!
//! let config = FilterConfigBuilder::new()
//!     .capacity(10_000)
//!     .error_rate(0.001)
//!     .build()
//!     .expect("valid config");
//!
//! let filter: CountingBloomFilter<str> = CountingBloomFilter::from_config(&config).unwrap();
//! assert_eq!(filter.hash_count(), config.params().unwrap().hash_count);
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use super::counting_bloom::{DEFAULT_CAPACITY, DEFAULT_ERROR_RATE};
use super::parameters::{select_parameters, validate_capacity, validate_error_rate, FilterParams};
use crate::error::FilterError;

/// Environment variable holding the design capacity.
pub const CAPACITY_ENV: &str = "CBF_CAPACITY";

/// Environment variable holding the target error rate.
pub const ERROR_RATE_ENV: &str = "CBF_ERROR_RATE";

/// Sizing inputs for a counting Bloom filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Expected number of elements (n)
    pub capacity: usize,
    /// Target false positive rate at `capacity`, in (0, 1)
    pub error_rate: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            error_rate: DEFAULT_ERROR_RATE,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(capacity: usize, error_rate: f64) -> Result<Self, FilterError> {
        let config = Self {
            capacity,
            error_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `CBF_CAPACITY` / `CBF_ERROR_RATE`.
    ///
    /// Unset or unparsable variables fall back to the defaults. The result
    /// is not validated.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            capacity: lookup(CAPACITY_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.capacity),
            error_rate: lookup(ERROR_RATE_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.error_rate),
        }
    }

    /// Reject zero capacity and error rates outside (0, 1)
    pub fn validate(&self) -> Result<(), FilterError> {
        validate_capacity(self.capacity)?;
        validate_error_rate(self.error_rate)
    }

    /// Optimal `(m, k)` for this configuration
    pub fn params(&self) -> Result<FilterParams, FilterError> {
        select_parameters(self.capacity, self.error_rate)
    }

    /// Builder-style method to set capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style method to set error rate
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    capacity: Option<usize>,
    error_rate: Option<f64>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected number of elements
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the target false positive rate
    pub fn error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = Some(error_rate);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let defaults = FilterConfig::default();

        let config = FilterConfig {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            error_rate: self.error_rate.unwrap_or(defaults.error_rate),
        };

        config.validate()?;
        Ok(config)
    }
}
