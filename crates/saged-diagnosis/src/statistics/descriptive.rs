//! Single-column descriptive statistics: central tendency, spread, shape.

use statrs::statistics::Statistics;

use super::reduce::{min_max, quantile_sorted, reduce_non_missing, sorted_non_missing};

pub fn mean(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| v.iter().mean())
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Population variance (ddof = 0).
pub fn variance(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| v.iter().population_variance())
}

/// Population standard deviation (ddof = 0).
pub fn standard_deviation(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| v.iter().population_std_dev())
}

/// Biased sample skewness `m3 / m2^1.5`. NaN for zero variance.
pub fn skewness(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| {
        let (m2, m3, _) = central_moments(v);
        if m2 <= 0.0 {
            return f64::NAN;
        }
        m3 / m2.powf(1.5)
    })
}

/// Biased excess kurtosis `m4 / m2² − 3`. NaN for zero variance.
pub fn kurtosis(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| {
        let (m2, _, m4) = central_moments(v);
        if m2 <= 0.0 {
            return f64::NAN;
        }
        m4 / (m2 * m2) - 3.0
    })
}

pub fn range(values: &[f64]) -> f64 {
    reduce_non_missing(values, |v| {
        let (lo, hi) = min_max(v);
        hi - lo
    })
}

/// Quantile `q ∈ [0, 1]` with linear interpolation.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted_non_missing(values), q)
}

/// `quantile(upper) − quantile(lower)`.
pub fn quantile_range(values: &[f64], lower: f64, upper: f64) -> f64 {
    let sorted = sorted_non_missing(values);
    quantile_sorted(&sorted, upper) - quantile_sorted(&sorted, lower)
}

/// `percentile(upper) − percentile(lower)`, bounds in `[0, 100]`.
pub fn percentile_range(values: &[f64], lower: f64, upper: f64) -> f64 {
    quantile_range(values, lower / 100.0, upper / 100.0)
}

/// Midpoint of the most populated bin of width `bin_width`, with bins laid
/// from the minimum up past the maximum. Ties go to the lowest bin.
///
/// Edges are `lo + i * step` with `step = (lo + bin_width) - lo`, and a
/// value belongs to the bin of the last edge at or below it.
pub fn mode(values: &[f64], bin_width: f64) -> f64 {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return f64::NAN;
    }
    reduce_non_missing(values, |v| {
        let edges = bin_edges(v, bin_width);
        let mut counts = vec![0usize; edges.len()];
        for &x in v {
            let bin = edges.partition_point(|&edge| edge <= x).saturating_sub(1);
            counts[bin] += 1;
        }

        let mut best = (0usize, 0usize);
        for (bin, &count) in counts.iter().enumerate() {
            if count > best.1 {
                best = (bin, count);
            }
        }
        edges[best.0] + bin_width / 2.0
    })
}

fn bin_edges(v: &[f64], bin_width: f64) -> Vec<f64> {
    let (lo, hi) = min_max(v);
    let n_edges = (((hi + bin_width) - lo) / bin_width).ceil().max(1.0) as usize;
    let step = (lo + bin_width) - lo;
    (0..n_edges)
        .map(|i| match i {
            0 => lo,
            1 => lo + bin_width,
            _ => lo + i as f64 * step,
        })
        .collect()
}

/// Second, third and fourth central moments (population).
fn central_moments(v: &[f64]) -> (f64, f64, f64) {
    let n = v.len() as f64;
    let m = v.iter().sum::<f64>() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in v {
        let d = x - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}
