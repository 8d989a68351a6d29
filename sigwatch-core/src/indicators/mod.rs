//! Close-price indicators used by the signal engine.
//!
//! Indicators are pure functions: a close series in, a numeric series of the
//! same length out. Warmup positions are `f64::NAN`.
//!
//! # Look-ahead contamination guard
//! No value at index t may depend on closes after t. Every indicator must
//! produce identical values on a truncated series and on the full series for
//! the overlapping indices.

pub mod ewma;
pub mod momentum;

pub use ewma::{ewma_of_series, Ewma};
pub use momentum::MomentumRatio;

/// Trait for close-series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ewma_20", "momentum_ratio_14").
    fn name(&self) -> &str;

    /// Number of closes needed before the first valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire close series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;

    /// Value at the last index, if it is valid.
    fn last(&self, closes: &[f64]) -> Option<f64> {
        self.compute(closes).last().copied().filter(|v| !v.is_nan())
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
