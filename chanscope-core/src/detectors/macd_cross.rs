//! MACD cross — DIF crosses DEA.
//!
//! Golden: DIF - DEA turns positive between the last two MACD points.
//! Death: it turns negative. Strength: 30 + 12 * timeframe weight.

use super::{Detection, SignalDetector};
use crate::domain::{clamp_strength, Bar, SignalKind, Timeframe};
use crate::indicators::{IndicatorBundle, MACD_SIGNAL, MACD_SLOW};

pub struct MacdCross;

impl SignalDetector for MacdCross {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn min_bars(&self) -> usize {
        MACD_SLOW + MACD_SIGNAL + 1
    }

    fn detect(
        &self,
        bars: &[Bar],
        indicators: &IndicatorBundle,
        timeframe: Timeframe,
    ) -> Option<Detection> {
        if indicators.macd.len() < 2 {
            return None;
        }
        let last_bar = bars.last()?;
        let prev = indicators.macd[indicators.macd.len() - 2];
        let last = indicators.macd[indicators.macd.len() - 1];

        let prev_spread = prev.dif - prev.dea;
        let last_spread = last.dif - last.dea;

        let kind = if prev_spread <= 0.0 && last_spread > 0.0 {
            SignalKind::MacdGoldenCross
        } else if prev_spread >= 0.0 && last_spread < 0.0 {
            SignalKind::MacdDeathCross
        } else {
            return None;
        };

        let mut strength = 30.0 + 12.0 * timeframe.weight();
        // TODO: scale the near-axis threshold by price before enabling this bonus
        if last.dif.abs() < last.dif.abs() * 0.1 {
            strength += 10.0;
        }

        let (verb, price) = match kind {
            SignalKind::MacdGoldenCross => ("golden", last_bar.close),
            _ => ("death", last_bar.close),
        };
        Some(Detection {
            kind,
            strength: clamp_strength(strength),
            price,
            description: format!(
                "MACD {verb} cross: DIF {:.4} vs DEA {:.4}",
                last.dif, last.dea
            ),
            key_levels: None,
        })
    }
}
