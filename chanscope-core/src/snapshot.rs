//! Serializable bundle of one run's structural output.
//!
//! Chart consumers read the snapshot; the fingerprint gives a cheap identity
//! for determinism checks and result caches (two runs over the same bars
//! must fingerprint identically).

use serde::Serialize;

use crate::chanlun::{Bi, ChanlunResult, Fractal, ProcessedBar, ThirdBuySignal, Zhongshu};
use crate::domain::{Market, SnapshotHash, Timeframe};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot {
    pub symbol: String,
    pub market: Market,
    pub timeframe: Timeframe,
    pub processed: Vec<ProcessedBar>,
    pub fractals: Vec<Fractal>,
    pub bis: Vec<Bi>,
    pub zhongshus: Vec<Zhongshu>,
    pub third_buys: Vec<ThirdBuySignal>,
}

impl AnalysisSnapshot {
    pub fn from_result(
        symbol: impl Into<String>,
        market: Market,
        timeframe: Timeframe,
        result: ChanlunResult,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            market,
            timeframe,
            processed: result.processed,
            fractals: result.fractals,
            bis: result.bis,
            zhongshus: result.zhongshus,
            third_buys: result.third_buys,
        }
    }

    /// BLAKE3 over the canonical JSON form.
    pub fn fingerprint(&self) -> SnapshotHash {
        let json = serde_json::to_vec(self).expect("AnalysisSnapshot serialization failed");
        SnapshotHash::from_bytes(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chanlun::{analyze, ChanlunParams};
    use crate::indicators::{atr_series, make_ohlc_bars};

    fn snapshot() -> AnalysisSnapshot {
        let data: Vec<(f64, f64, f64, f64)> = (0..40)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.9).sin() * 6.0;
                (c - 0.4, c + 1.2, c - 1.2, c)
            })
            .collect();
        let bars = make_ohlc_bars(&data);
        let atr = atr_series(&bars, 14);
        let params = ChanlunParams::for_market(Market::Crypto);
        let result = analyze(
            &bars,
            &atr,
            "BTCUSDT",
            Market::Crypto,
            Timeframe::H1,
            &params,
        );
        AnalysisSnapshot::from_result("BTCUSDT", Market::Crypto, Timeframe::H1, result)
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = snapshot();
        let b = snapshot();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = snapshot();
        let mut b = snapshot();
        b.symbol = "ETHUSDT".into();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn snapshot_serializes_snake_case() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert!(json.contains("\"third_buys\""));
        assert!(json.contains("\"zhongshus\""));
        assert!(json.contains("\"processed\""));
    }
}
