//! Trading signals — the monitor's user-facing output.
//!
//! Signals are immutable once emitted except for the `acknowledged` flag,
//! which the store flips in place. Strength is a 0–100 score; 50 and above
//! qualifies for toast fan-out.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SignalId;
use super::market::{Market, Timeframe};

/// Closed enumeration of everything the monitor can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BollingerBreakoutUp,
    BollingerBreakoutDown,
    MacdGoldenCross,
    MacdDeathCross,
    RsiOversoldReversal,
    RsiOverboughtReversal,
    VolatilitySurge,
    LargeBodyCandle,
    KeyLevelBreakout,
    MultiTimeframeResonance,
    ThirdBuyCandidate,
    ThirdBuyConfirmed,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::BollingerBreakoutUp => "bollinger_breakout_up",
            SignalKind::BollingerBreakoutDown => "bollinger_breakout_down",
            SignalKind::MacdGoldenCross => "macd_golden_cross",
            SignalKind::MacdDeathCross => "macd_death_cross",
            SignalKind::RsiOversoldReversal => "rsi_oversold_reversal",
            SignalKind::RsiOverboughtReversal => "rsi_overbought_reversal",
            SignalKind::VolatilitySurge => "volatility_surge",
            SignalKind::LargeBodyCandle => "large_body_candle",
            SignalKind::KeyLevelBreakout => "key_level_breakout",
            SignalKind::MultiTimeframeResonance => "multi_timeframe_resonance",
            SignalKind::ThirdBuyCandidate => "third_buy_candidate",
            SignalKind::ThirdBuyConfirmed => "third_buy_confirmed",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price levels a third-buy signal is anchored to, carried for chart overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    pub zhongshu_high: f64,
    pub zhongshu_low: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_price: Option<f64>,
}

/// An emitted trading signal.
///
/// `time` is wall-clock milliseconds at emission, not the bar time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub symbol: String,
    pub market: Market,
    pub timeframe: Timeframe,
    pub kind: SignalKind,
    pub strength: f64,
    pub price: f64,
    pub time: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_levels: Option<KeyLevels>,
    pub acknowledged: bool,
}

/// Clamp a raw strength score into the 0–100 band.
pub fn clamp_strength(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0)
}
