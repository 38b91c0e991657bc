//! Containment reduction — first Chanlun stage.
//!
//! Adjacent bars where one [low, high] range fully spans the other are merged
//! into a single processed bar, directionally: an uptrend merge keeps the
//! higher highs and lows, a downtrend merge the lower. The output contains no
//! adjacent containing pair.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// A bar after containment reduction.
///
/// `orig_index` is the index of the last source bar this processed bar
/// absorbed; `close` and `time` always come from that bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBar {
    pub orig_index: usize,
    pub time: i64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl ProcessedBar {
    fn from_bar(orig_index: usize, bar: &Bar) -> Self {
        Self {
            orig_index,
            time: bar.time,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }

    /// True if either range fully spans the other.
    pub fn contains_or_contained(&self, high: f64, low: f64) -> bool {
        (self.high >= high && self.low <= low) || (high >= self.high && low <= self.low)
    }
}

/// Reduce a bar sequence left-to-right.
pub fn reduce(bars: &[Bar]) -> Vec<ProcessedBar> {
    let mut out: Vec<ProcessedBar> = Vec::with_capacity(bars.len());

    for (i, cur) in bars.iter().enumerate() {
        let n = out.len();
        if n == 0 {
            out.push(ProcessedBar::from_bar(i, cur));
            continue;
        }

        if !out[n - 1].contains_or_contained(cur.high, cur.low) {
            out.push(ProcessedBar::from_bar(i, cur));
            continue;
        }

        // Trend from the tail vs the bar before it; a lone tail defaults up.
        let uptrend = n < 2 || out[n - 1].high > out[n - 2].high;

        let tail = &mut out[n - 1];
        if uptrend {
            tail.high = tail.high.max(cur.high);
            tail.low = tail.low.max(cur.low);
        } else {
            tail.high = tail.high.min(cur.high);
            tail.low = tail.low.min(cur.low);
        }
        tail.close = cur.close;
        tail.time = cur.time;
        tail.orig_index = i;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    fn ranges(data: &[(f64, f64)]) -> Vec<Bar> {
        // (high, low) pairs with open/close inside the range
        make_ohlc_bars(
            &data
                .iter()
                .map(|&(high, low)| {
                    let mid = (high + low) / 2.0;
                    (mid, high, low, mid)
                })
                .collect::<Vec<_>>(),
        )
    }

    fn no_adjacent_containment(processed: &[ProcessedBar]) -> bool {
        processed.windows(2).all(|w| {
            let (a, b) = (&w[0], &w[1]);
            !((a.high >= b.high && a.low <= b.low) || (b.high >= a.high && b.low <= a.low))
        })
    }

    #[test]
    fn identical_bars_collapse_to_one() {
        let bars = ranges(&[(100.0, 90.0); 5]);
        let processed = reduce(&bars);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].orig_index, 4);
        assert_eq!(processed[0].time, bars[4].time);
    }

    #[test]
    fn disjoint_bars_pass_through() {
        let bars = ranges(&[(100.0, 90.0), (105.0, 95.0), (110.0, 100.0)]);
        let processed = reduce(&bars);
        assert_eq!(processed.len(), 3);
        assert_eq!(processed[1].orig_index, 1);
    }

    #[test]
    fn uptrend_merge_keeps_higher_extremes() {
        // Rising pair establishes an uptrend, then a contained bar merges up.
        let bars = ranges(&[(100.0, 90.0), (106.0, 96.0), (104.0, 98.0)]);
        let processed = reduce(&bars);
        assert_eq!(processed.len(), 2);
        let tail = processed[1];
        assert_eq!(tail.high, 106.0);
        assert_eq!(tail.low, 98.0);
        assert_eq!(tail.orig_index, 2);
        assert_eq!(tail.close, bars[2].close);
    }

    #[test]
    fn downtrend_merge_keeps_lower_extremes() {
        // Falling pair establishes a downtrend, then a contained bar merges down.
        let bars = ranges(&[(106.0, 96.0), (100.0, 90.0), (98.0, 92.0)]);
        let processed = reduce(&bars);
        assert_eq!(processed.len(), 2);
        let tail = processed[1];
        assert_eq!(tail.high, 98.0);
        assert_eq!(tail.low, 90.0);
    }

    #[test]
    fn lone_tail_defaults_to_uptrend_merge() {
        let bars = ranges(&[(100.0, 90.0), (98.0, 92.0)]);
        let processed = reduce(&bars);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].high, 100.0);
        assert_eq!(processed[0].low, 92.0);
    }

    #[test]
    fn merge_always_adopts_newer_close_and_time() {
        let bars = ranges(&[(106.0, 96.0), (100.0, 90.0), (98.0, 92.0)]);
        let processed = reduce(&bars);
        let tail = processed[1];
        assert_eq!(tail.close, bars[2].close);
        assert_eq!(tail.time, bars[2].time);
    }

    #[test]
    fn output_has_no_adjacent_containment() {
        let bars = ranges(&[
            (100.0, 90.0),
            (104.0, 95.0),
            (103.0, 96.0),
            (99.0, 88.0),
            (101.0, 87.0),
            (105.0, 94.0),
            (102.0, 96.0),
        ]);
        let processed = reduce(&bars);
        assert!(no_adjacent_containment(&processed));
    }

    #[test]
    fn empty_input() {
        assert!(reduce(&[]).is_empty());
    }
}
