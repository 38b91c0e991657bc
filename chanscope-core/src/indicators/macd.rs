//! MACD — Moving Average Convergence/Divergence.
//!
//! DIF = EMA_fast(close) - EMA_slow(close) where both are defined.
//! DEA = EMA_signal over the compacted valid-DIF series.
//! Histogram = (DIF - DEA) * 2.
//! Output is restricted to positions where all three are defined; empty
//! unless bars.len >= slow + signal.

use serde::{Deserialize, Serialize};

use super::ema::ema_series;
use crate::domain::Bar;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// One fully-defined MACD position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub time: i64,
    pub dif: f64,
    pub dea: f64,
    pub histogram: f64,
}

/// Compute the MACD point series over bar closes.
pub fn macd_series(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    if fast == 0 || slow == 0 || signal == 0 || bars.len() < slow + signal {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_series(&closes, fast);
    let ema_slow = ema_series(&closes, slow);

    // Compact DIF to the positions where both EMAs are defined.
    let mut dif_index = Vec::new();
    let mut dif = Vec::new();
    for i in 0..bars.len() {
        if !ema_fast[i].is_nan() && !ema_slow[i].is_nan() {
            dif_index.push(i);
            dif.push(ema_fast[i] - ema_slow[i]);
        }
    }

    let dea = ema_series(&dif, signal);

    let mut out = Vec::new();
    for (j, &i) in dif_index.iter().enumerate() {
        if dea[j].is_nan() {
            continue;
        }
        out.push(MacdPoint {
            time: bars[i].time,
            dif: dif[j],
            dea: dea[j],
            histogram: (dif[j] - dea[j]) * 2.0,
        });
    }
    out
}
