//! Large-body candle — the last body dwarfs the recent average.
//!
//! Fires when |close - open| of the last bar exceeds 2.5x the mean body over
//! the last 20 bars. Strength: 20 + 10 * timeframe weight.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::IndicatorBundle;

const BODY_WINDOW: usize = 20;
const BODY_MULTIPLIER: f64 = 2.5;

pub struct LargeBodyCandle;

impl SignalDetector for LargeBodyCandle {
    fn name(&self) -> &str {
        "large_body_candle"
    }

    fn min_bars(&self) -> usize {
        BODY_WINDOW
    }

    fn detect(
        &self,
        bars: &[Bar],
        _indicators: &IndicatorBundle,
        timeframe: Timeframe,
    ) -> Option<Detection> {
        if bars.len() < self.min_bars() {
            return None;
        }
        let window = &bars[bars.len() - BODY_WINDOW..];
        let mean_body = window.iter().map(Bar::body).sum::<f64>() / BODY_WINDOW as f64;
        let last = bars.last()?;

        if last.body() <= BODY_MULTIPLIER * mean_body {
            return None;
        }

        let direction = if last.close >= last.open { "bullish" } else { "bearish" };
        Some(Detection {
            kind: SignalKind::LargeBodyCandle,
            strength: clamp_strength(20.0 + 10.0 * timeframe.weight()),
            price: last.close,
            description: format!(
                "{direction} candle body {:.4} vs 20-bar mean {:.4}",
                last.body(),
                mean_body
            ),
            key_levels: None,
        })
    }
}
