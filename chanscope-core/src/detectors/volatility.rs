//! Volatility surge — ATR expanding fast over the last five bars.
//!
//! delta = (ATR_last - ATR_{last-5}) / ATR_{last-5}; fires when delta > 0.3.
//! Strength: 25 + 50 * delta, clamped.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::IndicatorBundle;

const SURGE_LOOKBACK: usize = 5;
const SURGE_THRESHOLD: f64 = 0.3;

pub struct VolatilitySurge;

impl SignalDetector for VolatilitySurge {
    fn name(&self) -> &str {
        "volatility_surge"
    }

    fn min_bars(&self) -> usize {
        20
    }

    fn detect(
        &self,
        bars: &[Bar],
        indicators: &IndicatorBundle,
        _timeframe: Timeframe,
    ) -> Option<Detection> {
        if bars.len() < self.min_bars() {
            return None;
        }
        let last_idx = bars.len() - 1;
        let atr_last = *indicators.atr.get(last_idx)?;
        let atr_base = *indicators.atr.get(last_idx - SURGE_LOOKBACK)?;
        if atr_last.is_nan() || atr_base.is_nan() || atr_base <= 0.0 {
            return None;
        }

        let delta = (atr_last - atr_base) / atr_base;
        if delta <= SURGE_THRESHOLD {
            return None;
        }

        Some(Detection {
            kind: SignalKind::VolatilitySurge,
            strength: clamp_strength(25.0 + 50.0 * delta),
            price: bars[last_idx].close,
            description: format!("ATR expanded {:.1}% over five bars", delta * 100.0),
            key_levels: None,
        })
    }
}
