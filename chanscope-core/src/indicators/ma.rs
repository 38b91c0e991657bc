//! Moving-average set for chart overlays.
//!
//! SMA of closes for the standard panel of periods. Each series carries only
//! the positions with a defined value, as (time, value) points.

use serde::{Deserialize, Serialize};

use super::sma::sma_series;
use crate::domain::Bar;

pub const MA_PERIODS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    pub time: i64,
    pub value: f64,
}

/// One moving average of the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaSeries {
    pub period: usize,
    pub points: Vec<MaPoint>,
}

/// Compute the full MA panel. Periods longer than the input yield an empty
/// point list, not an error.
pub fn ma_set(bars: &[Bar]) -> Vec<MaSeries> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    MA_PERIODS
        .iter()
        .map(|&period| {
            let values = sma_series(&closes, period);
            let points = values
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_nan())
                .map(|(i, &value)| MaPoint {
                    time: bars[i].time,
                    value,
                })
                .collect();
            MaSeries { period, points }
        })
        .collect()
}
