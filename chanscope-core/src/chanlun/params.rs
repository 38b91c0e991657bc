//! Chanlun pipeline parameters with per-market defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Market;

/// How a third-buy candidate graduates to confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmRule {
    /// The confirming bi makes a new high above the breakout bi's end.
    NewHigh,
    /// The confirming bi breaks above the pullback bi's start.
    BreakPullbackHigh,
}

/// Thresholds for bi formation and third-buy detection.
///
/// ATR multipliers scale thresholds to the instrument's volatility, so one
/// parameter set works across price regimes within a market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanlunParams {
    /// Minimum processed-bar span of a bi.
    pub min_bi_kbars: usize,
    /// Minimum price move of a bi, in average-ATR units over its span.
    pub min_bi_move_atr: f64,
    /// Minimum breakout margin above the zhongshu high, in average-ATR units.
    pub breakout_atr: f64,
    /// How far a pullback may dip below the zhongshu high, in average-ATR units.
    pub pullback_tolerance_atr: f64,
    pub confirm_rule: ConfirmRule,
}

/// Invalid parameter or monitor configuration, rejected at construction.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_bi_kbars must be >= 2, got {0}")]
    MinBiKbars(usize),

    #[error("{name} must be a finite, non-negative multiplier, got {value}")]
    AtrMultiplier { name: &'static str, value: f64 },

    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
}

impl ChanlunParams {
    /// Per-market defaults. Crypto runs hotter bars, so it accepts shorter
    /// bis and smaller ATR-scaled margins.
    pub fn for_market(market: Market) -> Self {
        match market {
            Market::Crypto => Self {
                min_bi_kbars: 4,
                min_bi_move_atr: 0.8,
                breakout_atr: 0.4,
                pullback_tolerance_atr: 0.4,
                confirm_rule: ConfirmRule::BreakPullbackHigh,
            },
            _ => Self {
                min_bi_kbars: 5,
                min_bi_move_atr: 1.0,
                breakout_atr: 0.5,
                pullback_tolerance_atr: 0.3,
                confirm_rule: ConfirmRule::BreakPullbackHigh,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bi_kbars < 2 {
            return Err(ConfigError::MinBiKbars(self.min_bi_kbars));
        }
        for (name, value) in [
            ("min_bi_move_atr", self.min_bi_move_atr),
            ("breakout_atr", self.breakout_atr),
            ("pullback_tolerance_atr", self.pullback_tolerance_atr),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::AtrMultiplier { name, value });
            }
        }
        Ok(())
    }
}
