//! EWMA crossover: relative ordering of a fast and a slow EWMA at the last bar.
//!
//! Buy when fast > slow, Sell when fast < slow, None when they are equal.
//! This is a level comparison, not a fresh-cross detector: the signal holds for
//! as long as the ordering holds.

use crate::domain::Signal;
use crate::indicators::{Ewma, Indicator};

/// Fast/slow EWMA values at the last bar and the signal they imply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverReading {
    pub fast: f64,
    pub slow: f64,
    pub signal: Signal,
}

/// Signal implied by the ordering of two averages.
pub fn crossover_signal(fast: f64, slow: f64) -> Signal {
    if fast > slow {
        Signal::Buy
    } else if fast < slow {
        Signal::Sell
    } else {
        Signal::None
    }
}

#[derive(Debug, Clone)]
pub struct EwmaCrossover {
    fast: Ewma,
    slow: Ewma,
}

impl EwmaCrossover {
    pub fn new(fast_span: usize, slow_span: usize) -> Self {
        assert!(
            slow_span > fast_span,
            "slow_span must be > fast_span"
        );
        Self {
            fast: Ewma::new(fast_span),
            slow: Ewma::new(slow_span),
        }
    }

    pub fn name(&self) -> &str {
        "ewma_crossover"
    }

    /// Bars needed before the slow average is considered meaningful.
    pub fn warmup_bars(&self) -> usize {
        self.slow.span()
    }

    /// Read both averages at the last close. `None` if either is undefined.
    pub fn evaluate(&self, closes: &[f64]) -> Option<CrossoverReading> {
        let fast = self.fast.last(closes)?;
        let slow = self.slow.last(closes)?;
        Some(CrossoverReading {
            fast,
            slow,
            signal: crossover_signal(fast, slow),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_maps_to_signal() {
        assert_eq!(crossover_signal(1.1, 1.0), Signal::Buy);
        assert_eq!(crossover_signal(1.0, 1.1), Signal::Sell);
        assert_eq!(crossover_signal(1.0, 1.0), Signal::None);
    }

    #[test]
    fn uptrend_reads_buy() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let reading = EwmaCrossover::new(20, 50).evaluate(&closes).unwrap();
        assert!(reading.fast > reading.slow);
        assert_eq!(reading.signal, Signal::Buy);
    }

    #[test]
    fn downtrend_reads_sell() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 - i as f64 * 0.5).collect();
        let reading = EwmaCrossover::new(20, 50).evaluate(&closes).unwrap();
        assert_eq!(reading.signal, Signal::Sell);
    }

    #[test]
    fn flat_series_reads_none() {
        let closes = vec![1.0; 60];
        let reading = EwmaCrossover::new(20, 50).evaluate(&closes).unwrap();
        assert_eq!(reading.signal, Signal::None);
    }

    #[test]
    fn nan_close_yields_no_reading() {
        let mut closes = vec![150.0; 60];
        closes[59] = f64::NAN;
        assert!(EwmaCrossover::new(20, 50).evaluate(&closes).is_none());
    }

    #[test]
    #[should_panic(expected = "slow_span must be > fast_span")]
    fn rejects_inverted_spans() {
        EwmaCrossover::new(50, 20);
    }
}
