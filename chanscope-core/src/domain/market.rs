//! Market and timeframe tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market a symbol trades on. Selects the per-market Chanlun parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Fx,
    Cn,
    Hk,
    Us,
    Crypto,
    Commodities,
}

impl Market {
    pub const ALL: [Market; 6] = [
        Market::Fx,
        Market::Cn,
        Market::Hk,
        Market::Us,
        Market::Crypto,
        Market::Commodities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Fx => "fx",
            Market::Cn => "cn",
            Market::Hk => "hk",
            Market::Us => "us",
            Market::Crypto => "crypto",
            Market::Commodities => "commodities",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar interval under analysis.
///
/// Higher timeframes weigh signal strength up: a breakout on the daily chart
/// outranks the same breakout on a 5-minute chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "5m")]
    M5,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::D1,
        Timeframe::H4,
        Timeframe::H1,
        Timeframe::M15,
        Timeframe::M5,
    ];

    /// Strength weight applied by the signal detectors.
    pub fn weight(&self) -> f64 {
        match self {
            Timeframe::D1 => 3.0,
            Timeframe::H4 => 2.0,
            Timeframe::H1 => 1.5,
            Timeframe::M15 => 1.0,
            Timeframe::M5 => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::D1 => "1D",
            Timeframe::H4 => "4H",
            Timeframe::H1 => "1H",
            Timeframe::M15 => "15m",
            Timeframe::M5 => "5m",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
