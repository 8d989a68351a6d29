//! Momentum ratio: RSI-like share of upward movement over a trailing window.
//!
//! d[t] = close[t] - close[t-1]
//! ratio[t] = 100 * mean(max(d, 0)) / (mean(|d|) + 1e-9), over d[t-period+1..=t]
//! Lookback: period (needs period + 1 closes).
//! Flat window → 0 (the smoothing constant keeps the denominator positive).

use super::Indicator;

/// Added to the mean absolute change so a flat window does not divide by zero.
pub const SMOOTHING: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct MomentumRatio {
    period: usize,
    name: String,
}

impl MomentumRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "momentum period must be >= 1");
        Self {
            period,
            name: format!("momentum_ratio_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for MomentumRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        // changes[j] is the move into close j + 1
        for i in self.period..n {
            let window = &changes[i - self.period..i];
            if window.iter().any(|d| d.is_nan()) {
                continue;
            }
            let gains: f64 = window.iter().map(|d| d.max(0.0)).sum();
            let total: f64 = window.iter().map(|d| d.abs()).sum();
            let period = self.period as f64;
            result[i] = 100.0 * (gains / period) / (total / period + SMOOTHING);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    fn closes_from_changes(start: f64, changes: &[f64]) -> Vec<f64> {
        let mut closes = vec![start];
        for d in changes {
            let last = *closes.last().unwrap();
            closes.push(last + d);
        }
        closes
    }

    #[test]
    fn all_gains_near_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let ratio = MomentumRatio::new(14).last(&closes).unwrap();
        assert_approx(ratio, 100.0, 1e-6);
    }

    #[test]
    fn all_losses_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let ratio = MomentumRatio::new(14).last(&closes).unwrap();
        assert_approx(ratio, 0.0, 1e-9);
    }

    #[test]
    fn flat_window_is_zero_not_nan() {
        let closes = vec![100.0; 16];
        let ratio = MomentumRatio::new(14).last(&closes).unwrap();
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn mixed_window_share_of_upward_movement() {
        // 14 changes: gains sum 5.5, losses sum 4.5 → 55
        let mut changes = vec![0.5; 11];
        changes.extend([-1.5, -1.5, -1.5]);
        let closes = closes_from_changes(100.0, &changes);
        let ratio = MomentumRatio::new(14).last(&closes).unwrap();
        assert_approx(ratio, 55.0, 1e-6);
    }

    #[test]
    fn only_trailing_window_counts() {
        // Large early drop falls outside the 14-change window
        let mut changes = vec![-50.0];
        changes.extend(vec![1.0; 14]);
        let closes = closes_from_changes(200.0, &changes);
        let ratio = MomentumRatio::new(14).last(&closes).unwrap();
        assert_approx(ratio, 100.0, 1e-6);
    }

    #[test]
    fn fewer_than_period_plus_one_closes_is_undefined() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let result = MomentumRatio::new(14).compute(&closes);
        assert!(result.iter().all(|v| v.is_nan()));
        assert_eq!(MomentumRatio::new(14).last(&closes), None);
    }

    #[test]
    fn bounds() {
        let closes = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for (i, v) in MomentumRatio::new(3).compute(&closes).iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(v), "ratio out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn lookback() {
        assert_eq!(MomentumRatio::new(14).lookback(), 14);
    }
}
