//! RSI reversal — RSI crosses out of an extreme zone.
//!
//! Oversold: RSI crosses 30 upward. Overbought: RSI crosses 70 downward.
//! Strength: 35 + 15 * timeframe weight.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::{IndicatorBundle, RSI_PERIOD};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;

pub struct RsiReversal;

impl SignalDetector for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn min_bars(&self) -> usize {
        RSI_PERIOD + 2
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
        let last_idx = bars.len() - 1;
        let prev = *indicators.rsi.get(last_idx - 1)?;
        let last = *indicators.rsi.get(last_idx)?;
        if prev.is_nan() || last.is_nan() {
            return None;
        }

        let kind = if prev < OVERSOLD && last >= OVERSOLD {
            SignalKind::RsiOversoldReversal
        } else if prev > OVERBOUGHT && last <= OVERBOUGHT {
            SignalKind::RsiOverboughtReversal
        } else {
            return None;
        };

        let zone = match kind {
            SignalKind::RsiOversoldReversal => "oversold",
            _ => "overbought",
        };
        Some(Detection {
            kind,
            strength: clamp_strength(35.0 + 15.0 * timeframe.weight()),
            price: bars[last_idx].close,
            description: format!("RSI left the {zone} zone: {prev:.2} -> {last:.2}"),
            key_levels: None,
        })
    }
}
