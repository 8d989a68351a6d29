//! Exponentially weighted moving average (EWMA) parameterised by span.
//!
//! alpha = 2 / (span + 1). Seeded from the first value, bias-adjusted:
//!   y[t] = sum_i w_i * x[t-i] / sum_i w_i,  w_i = (1 - alpha)^i
//! computed recursively as num[t] = x[t] + (1-alpha)*num[t-1],
//! den[t] = 1 + (1-alpha)*den[t-1].
//! Lookback: 0 (first output equals the first input).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ewma {
    span: usize,
    name: String,
}

impl Ewma {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EWMA span must be >= 1");
        Self {
            span,
            name: format!("ewma_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Indicator for Ewma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        ewma_of_series(closes, self.span)
    }
}

/// Compute raw EWMA values from a pre-extracted f64 slice.
pub fn ewma_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || span == 0 {
        return result;
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut num = 0.0;
    let mut den = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            // NaN taints everything after it
            return result;
        }
        num = v + decay * num;
        den = 1.0 + decay * den;
        result[i] = num / den;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ewma_span_1_equals_input() {
        let result = Ewma::new(1).compute(&[100.0, 200.0, 300.0]);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ewma_3_known_values() {
        // alpha = 0.5, decay = 0.5
        // y0 = 10
        // y1 = (11 + 0.5*10) / 1.5 = 10.666...
        // y2 = (12 + 0.5*16) / 1.75 = 11.428571...
        let result = Ewma::new(3).compute(&[10.0, 11.0, 12.0]);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 16.0 / 1.5, DEFAULT_EPSILON);
        assert_approx(result[2], 20.0 / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn ewma_seeds_from_first_value_not_sma() {
        let result = Ewma::new(20).compute(&[50.0, 60.0]);
        assert_approx(result[0], 50.0, DEFAULT_EPSILON);
        assert!(!result[1].is_nan());
    }

    #[test]
    fn ewma_constant_series_is_constant() {
        let closes = vec![1.2345; 80];
        for v in Ewma::new(50).compute(&closes) {
            assert_approx(v, 1.2345, 1e-12);
        }
    }

    #[test]
    fn ewma_nan_propagates() {
        let result = Ewma::new(3).compute(&[10.0, 11.0, f64::NAN, 13.0]);
        assert!(!result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
    }

    #[test]
    fn faster_span_tracks_trend_closer() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let fast = Ewma::new(20).last(&closes).unwrap();
        let slow = Ewma::new(50).last(&closes).unwrap();
        assert!(fast > slow);
    }

    #[test]
    fn ewma_alpha() {
        assert_approx(Ewma::new(20).alpha(), 2.0 / 21.0, DEFAULT_EPSILON);
        assert_eq!(Ewma::new(20).name(), "ewma_20");
    }

    #[test]
    fn truncated_series_matches_prefix() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let full = ewma_of_series(&closes, 20);
        let truncated = ewma_of_series(&closes[..25], 20);
        for i in 0..25 {
            assert_approx(full[i], truncated[i], DEFAULT_EPSILON);
        }
    }
}
