//! Fractal detection — local extrema in the containment-reduced sequence.
//!
//! A top at interior index i requires P[i].high strictly above both
//! neighbors' highs; a bottom is symmetric on lows. A position cannot be
//! both: after reduction an outside bar would have contained its neighbor.

use serde::{Deserialize, Serialize};

use super::containment::ProcessedBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    Top,
    Bottom,
}

/// Local extremum of the processed sequence.
///
/// `index` addresses the processed sequence, `price` is the extreme high
/// (top) or low (bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub index: usize,
    pub time: i64,
    pub price: f64,
    pub kind: FractalKind,
}

/// Detect fractals over the processed sequence, in index order.
pub fn detect(processed: &[ProcessedBar]) -> Vec<Fractal> {
    let mut out = Vec::new();
    if processed.len() < 3 {
        return out;
    }

    for i in 1..processed.len() - 1 {
        let (prev, cur, next) = (&processed[i - 1], &processed[i], &processed[i + 1]);
        if cur.high > prev.high && cur.high > next.high {
            out.push(Fractal {
                index: i,
                time: cur.time,
                price: cur.high,
                kind: FractalKind::Top,
            });
        } else if cur.low < prev.low && cur.low < next.low {
            out.push(Fractal {
                index: i,
                time: cur.time,
                price: cur.low,
                kind: FractalKind::Bottom,
            });
        }
    }

    out
}
