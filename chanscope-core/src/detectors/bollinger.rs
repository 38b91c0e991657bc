//! Bollinger band breakout — close transitions across a band.
//!
//! Up: previous close at or under the upper band, last close above it.
//! Down: symmetric on the lower band. Strength: 40 + 15 * timeframe weight.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::{IndicatorBundle, BOLLINGER_PERIOD};

pub struct BollingerBreakout;

impl SignalDetector for BollingerBreakout {
    fn name(&self) -> &str {
        "bollinger_breakout"
    }

    fn min_bars(&self) -> usize {
        // Band must be defined on the previous bar too.
        BOLLINGER_PERIOD + 1
    }

    fn detect(
        &self,
        bars: &[Bar],
        indicators: &IndicatorBundle,
        timeframe: Timeframe,
    ) -> Option<Detection> {
        if bars.len() < self.min_bars() {
            return None;
        }
        let last = bars.len() - 1;
        let prev = last - 1;

        let prev_close = bars[prev].close;
        let last_close = bars[last].close;
        let upper_prev = *indicators.bollinger.upper.get(prev)?;
        let upper_last = *indicators.bollinger.upper.get(last)?;
        let lower_prev = *indicators.bollinger.lower.get(prev)?;
        let lower_last = *indicators.bollinger.lower.get(last)?;
        if upper_prev.is_nan() || upper_last.is_nan() || lower_prev.is_nan() || lower_last.is_nan()
        {
            return None;
        }

        let strength = clamp_strength(40.0 + 15.0 * timeframe.weight());

        if prev_close <= upper_prev && last_close > upper_last {
            Some(Detection {
                kind: SignalKind::BollingerBreakoutUp,
                strength,
                price: last_close,
                description: format!(
                    "close {last_close:.4} broke above the upper Bollinger band {upper_last:.4}"
                ),
                key_levels: None,
            })
        } else if prev_close >= lower_prev && last_close < lower_last {
            Some(Detection {
                kind: SignalKind::BollingerBreakoutDown,
                strength,
                price: last_close,
                description: format!(
                    "close {last_close:.4} broke below the lower Bollinger band {lower_last:.4}"
                ),
                key_levels: None,
            })
        } else {
            None
        }
    }
}
