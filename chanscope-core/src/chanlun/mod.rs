//! Chanlun pipeline — five sequential structural passes over one bar series.
//!
//! containment reduction → fractal detection → bi formation → zhongshu
//! detection → third-buy detection. Each stage consumes the previous stage's
//! output; every stage tolerates short input by producing empty output.

pub mod bi;
pub mod containment;
pub mod fractal;
pub mod params;
pub mod third_buy;
pub mod zhongshu;

pub use bi::{Bi, BiDirection};
pub use containment::ProcessedBar;
pub use fractal::{Fractal, FractalKind};
pub use params::{ChanlunParams, ConfigError, ConfirmRule};
pub use third_buy::{ThirdBuySignal, ThirdBuyStatus};
pub use zhongshu::Zhongshu;

use crate::domain::{Bar, Market, Timeframe};

/// Structural output of one full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChanlunResult {
    pub processed: Vec<ProcessedBar>,
    pub fractals: Vec<Fractal>,
    pub bis: Vec<Bi>,
    pub zhongshus: Vec<Zhongshu>,
    pub third_buys: Vec<ThirdBuySignal>,
}

/// Run the five stages in order.
///
/// `atr` is the bar-aligned ATR series (normally from the indicator bundle);
/// NaN entries count as unknown and are skipped when averaging over spans.
pub fn analyze(
    bars: &[Bar],
    atr: &[f64],
    symbol: &str,
    market: Market,
    timeframe: Timeframe,
    params: &ChanlunParams,
) -> ChanlunResult {
    let processed = containment::reduce(bars);
    let fractals = fractal::detect(&processed);
    let bis = bi::form(&fractals, atr, params);
    let zhongshus = zhongshu::detect(&bis);
    let third_buys = third_buy::detect(&zhongshus, &bis, atr, params, symbol, market, timeframe);

    tracing::debug!(
        symbol,
        %timeframe,
        bars = bars.len(),
        processed = processed.len(),
        fractals = fractals.len(),
        bis = bis.len(),
        zhongshus = zhongshus.len(),
        third_buys = third_buys.len(),
        "chanlun pass complete"
    );

    ChanlunResult {
        processed,
        fractals,
        bis,
        zhongshus,
        third_buys,
    }
}
