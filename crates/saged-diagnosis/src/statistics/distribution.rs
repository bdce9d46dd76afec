//! Distributional comparison against a baseline column.

use super::reduce::{min_max, non_missing};

/// Probability floor substituted for empty histogram bins.
pub const EMPTY_BIN_FLOOR: f64 = 1e-10;

/// Histogram of NaN-free, non-empty data as probability mass.
///
/// `bins` equal-width bins over the data's own `[min, max]`; a degenerate
/// range is widened to `[min − 0.5, max + 0.5]`. The last bin is closed.
pub fn histogram_mass(values: &[f64], bins: usize) -> Vec<f64> {
    let (mut lo, mut hi) = min_max(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &x in values {
        let bin = (((x - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    let total = values.len() as f64;
    counts.into_iter().map(|c| c as f64 / total).collect()
}

/// KL divergence `Σ p · ln(p / q)` of the target's histogram from the
/// baseline's. NaNs are dropped from each side independently; a missing
/// baseline is treated as all zeros.
pub fn kl_divergence(target: &[f64], baseline: Option<&[f64]>, bins: usize) -> f64 {
    if bins == 0 {
        return f64::NAN;
    }
    let p = non_missing(target);
    let q = match baseline {
        Some(b) => non_missing(b),
        None => vec![0.0; target.len()],
    };
    if p.is_empty() || q.is_empty() {
        return f64::NAN;
    }

    let p_mass = histogram_mass(&p, bins);
    let q_mass = histogram_mass(&q, bins);

    p_mass
        .iter()
        .zip(&q_mass)
        .map(|(&pi, &qi)| {
            let pi = if pi == 0.0 { EMPTY_BIN_FLOOR } else { pi };
            let qi = if qi == 0.0 { EMPTY_BIN_FLOOR } else { qi };
            pi * (pi / qi).ln()
        })
        .sum()
}
