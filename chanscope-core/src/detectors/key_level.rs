//! Key-level breakout — close clears the recent high-water mark.
//!
//! The reference level is the highest high over the last min(20, len-1) bars
//! excluding the current one. Fires when the prior close was at or under the
//! level and the last close is above it. Strength: 45 + 15 * timeframe weight.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::IndicatorBundle;

const MAX_LOOKBACK: usize = 20;

pub struct KeyLevelBreakout;

impl SignalDetector for KeyLevelBreakout {
    fn name(&self) -> &str {
        "key_level_breakout"
    }

    fn min_bars(&self) -> usize {
        2
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
        let last_idx = bars.len() - 1;
        let lookback = MAX_LOOKBACK.min(last_idx);
        let window = &bars[last_idx - lookback..last_idx];
        let prev_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

        let prior_close = bars[last_idx - 1].close;
        let last_close = bars[last_idx].close;
        if prior_close <= prev_high && last_close > prev_high {
            Some(Detection {
                kind: SignalKind::KeyLevelBreakout,
                strength: clamp_strength(45.0 + 15.0 * timeframe.weight()),
                price: last_close,
                description: format!(
                    "close {last_close:.4} broke the {lookback}-bar high {prev_high:.4}"
                ),
                key_levels: None,
            })
        } else {
            None
        }
    }
}
