//! Signal filters: gate a crossover signal on last-bar conditions.
//!
//! The momentum confirmation filter applies to momentum-filtered instrument
//! classes (crypto). A pass-through filter is used for everything else.

use serde::{Deserialize, Serialize};

use crate::domain::Signal;
use crate::indicators::{Indicator, MomentumRatio};

/// Outcome of a filter evaluating a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterVerdict {
    /// The filter ran and let the signal through.
    Passed,
    /// The filter does not apply (pass-through filter, or no directional signal).
    NotApplicable,
    /// Last-bar close-to-close move below the minimum body percentage.
    BodyTooSmall { body_pct: f64 },
    /// Momentum ratio on the wrong side of the direction's threshold.
    WeakMomentum { ratio: f64 },
}

impl FilterVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed | Self::NotApplicable)
    }
}

/// Trait for signal filters.
pub trait SignalFilter: Send + Sync {
    /// Human-readable name (e.g., "momentum_confirmation", "no_filter").
    fn name(&self) -> &str;

    /// Decide whether `signal` survives, looking only at `closes`.
    fn evaluate(&self, signal: Signal, closes: &[f64]) -> FilterVerdict;
}

/// Pass-through filter.
#[derive(Debug, Clone, Default)]
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn name(&self) -> &str {
        "no_filter"
    }

    fn evaluate(&self, _signal: Signal, _closes: &[f64]) -> FilterVerdict {
        FilterVerdict::NotApplicable
    }
}

/// Body-size plus momentum-ratio confirmation.
#[derive(Debug, Clone)]
pub struct MomentumConfirmation {
    /// Minimum |last close - previous close| / previous close, in percent.
    pub min_body_pct: f64,
    /// A Buy needs at least this momentum ratio.
    pub buy_min_momentum: f64,
    /// A Sell needs at most this momentum ratio.
    pub sell_max_momentum: f64,
    momentum: MomentumRatio,
}

impl MomentumConfirmation {
    pub fn new(
        min_body_pct: f64,
        momentum_period: usize,
        buy_min_momentum: f64,
        sell_max_momentum: f64,
    ) -> Self {
        Self {
            min_body_pct,
            buy_min_momentum,
            sell_max_momentum,
            momentum: MomentumRatio::new(momentum_period),
        }
    }

    /// Last-bar close-to-close move in percent. `None` with fewer than two closes.
    pub fn body_pct(closes: &[f64]) -> Option<f64> {
        let [.., prev, last] = closes else {
            return None;
        };
        if *prev <= 0.0 || prev.is_nan() || last.is_nan() {
            return None;
        }
        Some((last - prev).abs() / prev * 100.0)
    }

    /// Momentum ratio at the last close. `None` when the window is not filled.
    pub fn momentum_ratio(&self, closes: &[f64]) -> Option<f64> {
        self.momentum.last(closes)
    }

    /// Threshold logic, separated from indicator computation.
    ///
    /// A missing reading skips its step; the body check runs before momentum.
    pub fn check(&self, signal: Signal, body_pct: Option<f64>, ratio: Option<f64>) -> FilterVerdict {
        if !signal.is_directional() {
            return FilterVerdict::NotApplicable;
        }

        if let Some(body_pct) = body_pct {
            if body_pct < self.min_body_pct {
                return FilterVerdict::BodyTooSmall { body_pct };
            }
        }

        if let Some(ratio) = ratio {
            let weak = match signal {
                Signal::Buy => ratio < self.buy_min_momentum,
                Signal::Sell => ratio > self.sell_max_momentum,
                Signal::None => false,
            };
            if weak {
                return FilterVerdict::WeakMomentum { ratio };
            }
        }

        FilterVerdict::Passed
    }
}

impl Default for MomentumConfirmation {
    fn default() -> Self {
        Self::new(0.5, 14, 60.0, 40.0)
    }
}

impl SignalFilter for MomentumConfirmation {
    fn name(&self) -> &str {
        "momentum_confirmation"
    }

    fn evaluate(&self, signal: Signal, closes: &[f64]) -> FilterVerdict {
        self.check(signal, Self::body_pct(closes), self.momentum_ratio(closes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_with_ratio_55_is_discarded() {
        let filter = MomentumConfirmation::default();
        let verdict = filter.check(Signal::Buy, Some(0.8), Some(55.0));
        assert_eq!(verdict, FilterVerdict::WeakMomentum { ratio: 55.0 });
        assert!(!verdict.is_passed());
    }

    #[test]
    fn buy_with_ratio_65_is_preserved() {
        let filter = MomentumConfirmation::default();
        assert_eq!(
            filter.check(Signal::Buy, Some(0.8), Some(65.0)),
            FilterVerdict::Passed
        );
    }

    #[test]
    fn sell_needs_ratio_at_most_40() {
        let filter = MomentumConfirmation::default();
        assert!(filter.check(Signal::Sell, Some(0.8), Some(35.0)).is_passed());
        assert!(filter.check(Signal::Sell, Some(0.8), Some(40.0)).is_passed());
        assert!(!filter.check(Signal::Sell, Some(0.8), Some(45.0)).is_passed());
    }

    #[test]
    fn small_body_discards_before_momentum() {
        let filter = MomentumConfirmation::default();
        let verdict = filter.check(Signal::Buy, Some(0.3), Some(90.0));
        assert_eq!(verdict, FilterVerdict::BodyTooSmall { body_pct: 0.3 });
    }

    #[test]
    fn missing_momentum_passes_base_signal_through() {
        let filter = MomentumConfirmation::default();
        assert_eq!(filter.check(Signal::Sell, Some(1.0), None), FilterVerdict::Passed);
    }

    #[test]
    fn none_signal_is_not_filtered() {
        let filter = MomentumConfirmation::default();
        assert_eq!(
            filter.check(Signal::None, Some(0.0), Some(0.0)),
            FilterVerdict::NotApplicable
        );
    }

    #[test]
    fn body_pct_uses_previous_close() {
        let body = MomentumConfirmation::body_pct(&[99.0, 100.0, 101.0]).unwrap();
        assert!((body - 1.0).abs() < 1e-12);
        assert_eq!(MomentumConfirmation::body_pct(&[100.0]), None);
    }

    #[test]
    fn short_series_skips_momentum_step() {
        // 10 closes: momentum window (14) not filled, last move 1%
        let mut closes = vec![100.0; 9];
        closes.push(101.0);
        let filter = MomentumConfirmation::default();
        assert_eq!(filter.evaluate(Signal::Buy, &closes), FilterVerdict::Passed);
    }

    #[test]
    fn no_filter_passes_everything() {
        assert!(NoFilter.evaluate(Signal::Buy, &[]).is_passed());
        assert_eq!(NoFilter.name(), "no_filter");
    }
}
