//! The shared NaN-skipping reduction every statistic is built on.
//!
//! Missing values are NaN. A reduction sees only the non-missing values and
//! yields NaN when there are none, so no statistic ever panics on an empty
//! or all-missing group.

/// Non-missing values, in input order.
pub fn non_missing(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Apply `f` to the non-missing values, or return NaN if there are none.
pub fn reduce_non_missing<F>(values: &[f64], f: F) -> f64
where
    F: FnOnce(&[f64]) -> f64,
{
    let present = non_missing(values);
    if present.is_empty() {
        f64::NAN
    } else {
        f(&present)
    }
}

/// Non-missing values, sorted ascending.
pub fn sorted_non_missing(values: &[f64]) -> Vec<f64> {
    let mut sorted = non_missing(values);
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile `q ∈ [0, 1]` of sorted data using linear interpolation between
/// closest ranks. NaN for empty input or `q` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Smallest and largest value of non-empty, NaN-free data.
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_all_nan_is_nan() {
        let r = reduce_non_missing(&[f64::NAN, f64::NAN], |v| v.len() as f64);
        assert!(r.is_nan());
        assert!(reduce_non_missing(&[], |_| 1.0).is_nan());
    }

    #[test]
    fn test_reduce_skips_nan() {
        let r = reduce_non_missing(&[1.0, f64::NAN, 3.0], |v| v.iter().sum());
        assert_eq!(r, 4.0);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert!((quantile_sorted(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert!(quantile_sorted(&sorted, 1.5).is_nan());
    }
}
