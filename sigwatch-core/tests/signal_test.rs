//! Integration tests for the signal engine on candle series.
//!
//! Tests:
//! 1. Trending series produce the expected crossover direction.
//! 2. Look-ahead: EWMA values read on a prefix equal the full-series values
//!    at the same bar.
//! 3. Crypto confirmation: momentum ratio 55 discards a BUY, 65 keeps it.
//! 4. Unusable series (too short, NaN close) are errors, not signals.

use chrono::{Duration, TimeZone, Utc};
use sigwatch_core::domain::{Candle, InstrumentClass, Signal};
use sigwatch_core::indicators::ewma_of_series;
use sigwatch_core::signal::FilterVerdict;
use sigwatch_core::{generate_signal, SignalEngine, SignalError};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// 15-minute candles with the given closes; open is the previous close.
fn candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: start + Duration::minutes(15 * i as i64),
                open,
                high: open.max(close),
                low: open.min(close),
                close,
            }
        })
        .collect()
}

/// 46 closes rising by 1.0 from 100, followed by the given changes.
fn trend_then(changes: &[f64]) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..46).map(|i| 100.0 + i as f64).collect();
    for d in changes {
        let last = *closes.last().unwrap();
        closes.push(last + d);
    }
    closes
}

// ──────────────────────────────────────────────
// Crossover
// ──────────────────────────────────────────────

#[test]
fn uptrend_is_buy_for_every_class() {
    let series = candles(&(0..80).map(|i| 100.0 * 1.01_f64.powi(i)).collect::<Vec<_>>());
    for class in [InstrumentClass::Fx, InstrumentClass::Crypto, InstrumentClass::Other] {
        assert_eq!(generate_signal(&series, class).unwrap(), Signal::Buy, "{class}");
    }
}

#[test]
fn downtrend_is_sell_for_fx() {
    let series = candles(&(0..80).map(|i| 200.0 - i as f64 * 0.25).collect::<Vec<_>>());
    assert_eq!(
        generate_signal(&series, InstrumentClass::Fx).unwrap(),
        Signal::Sell
    );
}

#[test]
fn prefix_evaluation_ignores_later_bars() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0 + i as f64 * 0.05)
        .collect();
    let full_fast = ewma_of_series(&closes, 20);
    let full_slow = ewma_of_series(&closes, 50);
    let engine = SignalEngine::default();

    for end in 50..=closes.len() {
        let eval = engine
            .evaluate_closes(&closes[..end], InstrumentClass::Fx)
            .unwrap();
        assert_eq!(eval.fast_ewma, full_fast[end - 1], "fast EWMA leaks at bar {end}");
        assert_eq!(eval.slow_ewma, full_slow[end - 1], "slow EWMA leaks at bar {end}");
    }
}

// ──────────────────────────────────────────────
// Crypto confirmation
// ──────────────────────────────────────────────

#[test]
fn crypto_buy_with_ratio_55_is_discarded() {
    // Trailing 14 changes: gains 5.5, losses 4.5; last move -1.5 (about 1%)
    let mut changes = vec![0.5; 11];
    changes.extend([-1.5, -1.5, -1.5]);
    let closes = trend_then(&changes);

    let eval = SignalEngine::default()
        .evaluate(&candles(&closes), InstrumentClass::Crypto)
        .unwrap();
    assert_eq!(eval.base, Signal::Buy);
    match eval.verdict {
        FilterVerdict::WeakMomentum { ratio } => assert!((ratio - 55.0).abs() < 1e-6),
        other => panic!("expected weak momentum, got {other:?}"),
    }
    assert_eq!(eval.signal, Signal::None);
}

#[test]
fn crypto_buy_with_ratio_65_is_kept() {
    // Trailing 14 changes: gains 6.5, losses 3.5
    let mut changes = vec![0.5; 13];
    changes.push(-3.5);
    let closes = trend_then(&changes);

    let eval = SignalEngine::default()
        .evaluate(&candles(&closes), InstrumentClass::Crypto)
        .unwrap();
    assert_eq!(eval.base, Signal::Buy);
    assert_eq!(eval.verdict, FilterVerdict::Passed);
    assert_eq!(eval.signal, Signal::Buy);
}

#[test]
fn same_series_as_fx_ignores_momentum() {
    let mut changes = vec![0.5; 11];
    changes.extend([-1.5, -1.5, -1.5]);
    let series = candles(&trend_then(&changes));
    assert_eq!(
        generate_signal(&series, InstrumentClass::Fx).unwrap(),
        Signal::Buy
    );
}

// ──────────────────────────────────────────────
// Unusable series
// ──────────────────────────────────────────────

#[test]
fn short_series_is_unusable() {
    let series = candles(&[100.0; 49]);
    assert_eq!(
        generate_signal(&series, InstrumentClass::Crypto),
        Err(SignalError::InsufficientBars { needed: 50, got: 49 })
    );
}

#[test]
fn empty_series_is_unusable() {
    assert!(matches!(
        generate_signal(&[], InstrumentClass::Fx),
        Err(SignalError::InsufficientBars { got: 0, .. })
    ));
}

#[test]
fn nan_close_is_unusable() {
    let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    closes[59] = f64::NAN;
    assert_eq!(
        generate_signal(&candles(&closes), InstrumentClass::Fx),
        Err(SignalError::InvalidClose { index: 59 })
    );
}
