//! Bollinger Bands — SMA middle band +/- standard deviation multiplier.
//!
//! Uses population stddev (divide by N, not N-1). All three bands are
//! NaN-aligned to the input; first valid value at index period-1.

use crate::domain::Bar;

/// The three Bollinger bands, each aligned to the bar index.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerSeries {
    fn all_nan(n: usize) -> Self {
        Self {
            middle: vec![f64::NAN; n],
            upper: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        }
    }
}

/// Compute Bollinger bands over bar closes.
pub fn bollinger_series(bars: &[Bar], period: usize, std_dev: f64) -> BollingerSeries {
    let n = bars.len();
    let mut out = BollingerSeries::all_nan(n);

    if n < period || period == 0 {
        return out;
    }

    for i in (period - 1)..n {
        let window = &bars[(i + 1 - period)..=i];

        let mut has_nan = false;
        let mut sum = 0.0;
        for bar in window {
            if bar.close.is_nan() {
                has_nan = true;
                break;
            }
            sum += bar.close;
        }
        if has_nan {
            continue;
        }

        let mean = sum / period as f64;
        let variance: f64 = window
            .iter()
            .map(|bar| {
                let diff = bar.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        out.middle[i] = mean;
        out.upper[i] = mean + std_dev * stddev;
        out.lower[i] = mean - std_dev * stddev;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bollinger_flat_series_collapses_to_middle() {
        let bars = make_bars(&[100.0; 25]);
        let bands = bollinger_series(&bars, 20, 2.0);
        for i in 0..19 {
            assert!(bands.middle[i].is_nan());
        }
        assert_approx(bands.middle[19], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.upper[19], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[19], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_population_stddev() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population variance 4, stddev 2.
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let bands = bollinger_series(&bars, 8, 2.0);
        assert_approx(bands.middle[7], 5.0, DEFAULT_EPSILON);
        assert_approx(bands.upper[7], 9.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[7], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_bracket_middle() {
        let bars = make_bars(&[100.0, 102.0, 99.0, 104.0, 101.0, 106.0, 98.0, 105.0]);
        let bands = bollinger_series(&bars, 5, 2.0);
        for i in 4..8 {
            assert!(bands.lower[i] <= bands.middle[i]);
            assert!(bands.middle[i] <= bands.upper[i]);
        }
    }

    #[test]
    fn bollinger_too_few_bars() {
        let bars = make_bars(&[100.0, 101.0]);
        let bands = bollinger_series(&bars, 20, 2.0);
        assert!(bands.middle.iter().all(|v| v.is_nan()));
        assert!(bands.upper.iter().all(|v| v.is_nan()));
        assert!(bands.lower.iter().all(|v| v.is_nan()));
    }
}
