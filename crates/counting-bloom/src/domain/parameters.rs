//! Optimal counting Bloom filter sizing
//!
//! For a target capacity `n` and error rate `p`, every candidate hash count
//! `k` in `[1, 100)` yields the array size
//!
//! ```text
//! m(k) = ceil(-k * n / ln(1 - p^(1/k)))
//! ```
//!
//! and the candidate with the smallest `m` wins. Ties keep the smaller `k`.

use crate::error::FilterError;

/// Exclusive upper bound of the hash counts considered by [`select_parameters`].
pub const MAX_HASH_CANDIDATES: usize = 100;

/// Sizing pair chosen at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of counters in the array (m)
    pub size: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// False positive rate at design capacity with these parameters
    pub expected_fpr: f64,
}

/// Select the `(m, k)` pair minimizing `m` for the given capacity and error rate.
///
/// # Errors
/// `InvalidParameter` when `capacity` is zero or `error_rate` is outside `(0, 1)`.
pub fn select_parameters(capacity: usize, error_rate: f64) -> Result<FilterParams, FilterError> {
    validate_capacity(capacity)?;
    validate_error_rate(error_rate)?;

    Ok(optimal_parameters(capacity, error_rate))
}

/// Selection loop without input validation.
///
/// Every error rate in `(0, 1)` yields a finite size for some `k`; the
/// `(capacity, 1)` fallback only covers degenerate inputs.
pub(crate) fn optimal_parameters(capacity: usize, error_rate: f64) -> FilterParams {
    let n = capacity as f64;
    let mut best: Option<(usize, usize)> = None;

    for k in 1..MAX_HASH_CANDIDATES {
        let Some(size) = size_for_hash_count(n, error_rate, k) else {
            continue;
        };
        // Strict comparison keeps the first (smallest k) candidate on ties.
        if best.map_or(true, |(best_size, _)| size < best_size) {
            best = Some((size, k));
        }
    }

    let (size, hash_count) = best.unwrap_or((capacity.max(1), 1));

    FilterParams {
        size,
        hash_count,
        expected_fpr: calculate_fpr(size, capacity, hash_count),
    }
}

/// `m(k)` for one candidate, `None` when the formula degenerates.
fn size_for_hash_count(n: f64, error_rate: f64, k: usize) -> Option<usize> {
    let k = k as f64;
    let denominator = (1.0 - error_rate.powf(1.0 / k)).ln();
    let size = (-k * n / denominator).ceil();
    (size.is_finite() && size >= 1.0).then_some(size as usize)
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<(), FilterError> {
    if capacity == 0 {
        return Err(FilterError::invalid("capacity", "must be positive"));
    }
    Ok(())
}

pub(crate) fn validate_error_rate(error_rate: f64) -> Result<(), FilterError> {
    // Also rejects NaN.
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(FilterError::invalid(
            "error_rate",
            format!("{error_rate} is not in (0, 1)"),
        ));
    }
    Ok(())
}
