//! Technical signal detectors.
//!
//! Detectors are market-event scanners over the latest bars plus the
//! precomputed indicator bundle. They are stateless and portfolio-agnostic;
//! deduplication and id/time assignment happen in the orchestrator. A
//! detector that lacks warmup data returns None, never an error.

pub mod bollinger;
pub mod candle;
pub mod key_level;
pub mod macd_cross;
pub mod rsi_reversal;
pub mod volatility;

pub use bollinger::BollingerBreakout;
pub use candle::LargeBodyCandle;
pub use key_level::KeyLevelBreakout;
pub use macd_cross::MacdCross;
pub use rsi_reversal::RsiReversal;
pub use volatility::VolatilitySurge;

use crate::chanlun::{ThirdBuySignal, ThirdBuyStatus, Zhongshu};
use crate::domain::{clamp_strength, Bar, KeyLevels, SignalKind, Timeframe};
use crate::indicators::IndicatorBundle;

/// A detector hit, before dedup gating and id/time assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub kind: SignalKind,
    pub strength: f64,
    pub price: f64,
    pub description: String,
    pub key_levels: Option<KeyLevels>,
}

/// Trait for signal detectors.
///
/// `detect` must only look at the tail of `bars` and the bundle; it fires at
/// most one detection per evaluation (a breakout cannot be both up and down).
pub trait SignalDetector: Send + Sync {
    /// Stable name (e.g., "bollinger_breakout").
    fn name(&self) -> &str;

    /// Bars needed before the detector can produce output.
    fn min_bars(&self) -> usize;

    fn detect(
        &self,
        bars: &[Bar],
        indicators: &IndicatorBundle,
        timeframe: Timeframe,
    ) -> Option<Detection>;
}

/// The full detector set, in evaluation order.
pub fn standard_detectors() -> Vec<Box<dyn SignalDetector>> {
    vec![
        Box::new(BollingerBreakout),
        Box::new(MacdCross),
        Box::new(RsiReversal),
        Box::new(VolatilitySurge),
        Box::new(LargeBodyCandle),
        Box::new(KeyLevelBreakout),
    ]
}

/// Convert a third-buy structural signal into a detection.
///
/// Confirmed setups score 85, candidates 55. Key levels carry the anchoring
/// zhongshu range plus the pullback/confirmation prices when known.
pub fn third_buy_detection(tb: &ThirdBuySignal, zhongshus: &[Zhongshu]) -> Detection {
    let zhongshu = zhongshus.iter().find(|z| z.id == tb.zhongshu_id);
    let key_levels = zhongshu.map(|z| KeyLevels {
        zhongshu_high: z.high,
        zhongshu_low: z.low,
        pullback_low: tb.pullback_low,
        confirm_price: tb.confirm_price,
    });

    match tb.status {
        ThirdBuyStatus::Confirmed => {
            let price = tb.confirm_price.unwrap_or(tb.breakout_price);
            Detection {
                kind: SignalKind::ThirdBuyConfirmed,
                strength: clamp_strength(85.0),
                price,
                description: format!("third buy confirmed at {price:.4} above the zhongshu"),
                key_levels,
            }
        }
        ThirdBuyStatus::Candidate => Detection {
            kind: SignalKind::ThirdBuyCandidate,
            strength: clamp_strength(55.0),
            price: tb.breakout_price,
            description: format!(
                "third buy candidate: breakout to {:.4} above the zhongshu",
                tb.breakout_price
            ),
            key_levels,
        },
    }
}
