//! Bar — the fundamental market data unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC bar for a single symbol over a fixed interval.
///
/// `time` is epoch seconds. Bars arrive oldest-first with strictly ascending
/// times; interval alignment is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// Returns true if any OHLC field is non-finite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// OHLC ordering check: low <= min(open, close) <= max(open, close) <= high.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }

    /// Absolute size of the candle body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }
}

/// Malformed-bar rejection, raised at the orchestrator boundary before any
/// stage runs. The kernels themselves never see an invalid sequence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarError {
    #[error("bar {index} has a non-finite OHLC value")]
    NonFinite { index: usize },

    #[error("bar {index} violates low <= open/close <= high")]
    OhlcOrder { index: usize },

    #[error("bar {index} does not advance time (times must be strictly ascending)")]
    NonMonotonicTime { index: usize },
}

/// Validate an input sequence against the bar invariants.
///
/// An empty sequence is valid (downstream stages treat it as insufficient
/// data and produce empty output).
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarError> {
    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            return Err(BarError::NonFinite { index });
        }
        if !bar.is_sane() {
            return Err(BarError::OhlcOrder { index });
        }
        if index > 0 && bar.time <= bars[index - 1].time {
            return Err(BarError::NonMonotonicTime { index });
        }
    }
    Ok(())
}
