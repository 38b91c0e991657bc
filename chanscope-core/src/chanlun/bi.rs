//! Bi formation — directed segments between alternating fractals.
//!
//! Fractals are first filtered to a strictly alternating top/bottom sequence
//! (a same-kind repeat is replaced by the more extreme one). Each adjacent
//! pair then becomes a bi when it spans at least `min_bi_kbars` processed
//! bars and moves at least `min_bi_move_atr` average ATRs.

use serde::{Deserialize, Serialize};

use super::fractal::{Fractal, FractalKind};
use super::params::ChanlunParams;
use crate::domain::BiId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiDirection {
    Up,
    Down,
}

/// Directed segment joining two alternating fractals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bi {
    pub id: BiId,
    pub direction: BiDirection,
    pub start: Fractal,
    pub end: Fractal,
    pub kbar_count: usize,
}

impl Bi {
    pub fn range_high(&self) -> f64 {
        self.start.price.max(self.end.price)
    }

    pub fn range_low(&self) -> f64 {
        self.start.price.min(self.end.price)
    }

    /// True if this bi's price range intersects [low, high].
    pub fn intersects(&self, low: f64, high: f64) -> bool {
        self.range_low() <= high && self.range_high() >= low
    }
}

/// Filter fractals to a strictly alternating sequence, keeping the more
/// extreme of any same-kind run.
pub fn alternate_filter(fractals: &[Fractal]) -> Vec<Fractal> {
    let mut out: Vec<Fractal> = Vec::with_capacity(fractals.len());
    for &f in fractals {
        let same_kind = matches!(out.last(), Some(last) if last.kind == f.kind);
        if !same_kind {
            out.push(f);
            continue;
        }
        if let Some(last) = out.last_mut() {
            let more_extreme = match f.kind {
                FractalKind::Top => f.price > last.price,
                FractalKind::Bottom => f.price < last.price,
            };
            if more_extreme {
                *last = f;
            }
        }
    }
    out
}

/// Average of the defined ATR values over `[start, end]` (indices into the
/// bar-aligned ATR series). An all-NaN span averages to 0: the move threshold
/// is then waived rather than guessed.
pub(crate) fn avg_atr(atr: &[f64], start: usize, end: usize) -> f64 {
    if atr.is_empty() {
        return 0.0;
    }
    let end = end.min(atr.len() - 1);
    if start > end {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in &atr[start..=end] {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Form bis from the fractal list. Ids are dense and 0-based in emission order.
pub fn form(fractals: &[Fractal], atr: &[f64], params: &ChanlunParams) -> Vec<Bi> {
    let filtered = alternate_filter(fractals);
    let mut out = Vec::new();

    for pair in filtered.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let kbar_count = end.index - start.index;
        if kbar_count < params.min_bi_kbars {
            continue;
        }

        let avg = avg_atr(atr, start.index, end.index);
        if avg > 0.0 && (end.price - start.price).abs() < params.min_bi_move_atr * avg {
            continue;
        }

        let direction = if start.kind == FractalKind::Bottom {
            BiDirection::Up
        } else {
            BiDirection::Down
        };
        out.push(Bi {
            id: BiId(out.len() as u64),
            direction,
            start,
            end,
            kbar_count,
        });
    }

    out
}
