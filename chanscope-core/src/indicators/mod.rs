//! Indicator kernels — pure functions over a read-only bar slice.
//!
//! Every kernel is deterministic and referentially transparent. Aligned
//! outputs carry NaN for undefined warmup positions; compacted outputs
//! (MACD, MA panel) carry only defined positions. Insufficient input means
//! empty/all-NaN output, never an error.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::{atr_series, true_range, wilder_smooth};
pub use bollinger::{bollinger_series, BollingerSeries};
pub use ema::ema_series;
pub use ma::{ma_set, MaPoint, MaSeries, MA_PERIODS};
pub use macd::{macd_series, MacdPoint, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
pub use rsi::rsi_series;
pub use sma::sma_series;

use crate::domain::Bar;

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;

/// The full indicator set, computed once per analysis run and handed
/// read-only to the signal detectors and the Chanlun pipeline.
#[derive(Debug, Clone)]
pub struct IndicatorBundle {
    pub ma: Vec<MaSeries>,
    pub macd: Vec<MacdPoint>,
    pub rsi: Vec<f64>,
    pub bollinger: BollingerSeries,
    pub atr: Vec<f64>,
}

impl IndicatorBundle {
    pub fn compute(bars: &[Bar]) -> Self {
        Self {
            ma: ma_set(bars),
            macd: macd_series(bars, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
            rsi: rsi_series(bars, RSI_PERIOD),
            bollinger: bollinger_series(bars, BOLLINGER_PERIOD, BOLLINGER_STD_DEV),
            atr: atr_series(bars, ATR_PERIOD),
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                time: 1_700_000_000 + (i as i64) * 60,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            time: 1_700_000_000 + (i as i64) * 60,
            open,
            high,
            low,
            close,
            volume: Some(1000.0),
        })
        .collect()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_aligned_series_match_input_length() {
        let bars = make_bars(&vec![100.0; 30]);
        let bundle = IndicatorBundle::compute(&bars);
        assert_eq!(bundle.rsi.len(), 30);
        assert_eq!(bundle.atr.len(), 30);
        assert_eq!(bundle.bollinger.middle.len(), 30);
    }

    #[test]
    fn bundle_on_empty_input() {
        let bundle = IndicatorBundle::compute(&[]);
        assert!(bundle.rsi.is_empty());
        assert!(bundle.atr.is_empty());
        assert!(bundle.macd.is_empty());
        assert!(bundle.ma.iter().all(|s| s.points.is_empty()));
    }
}
