//! Dixon's Q test (3 ≤ n ≤ 30, single outlier in small samples).
//!
//! Critical values are tabulated by sample size and significance level.
//! The ratio variant depends on n: r10 for n ≤ 7, r11 for 8..=10, r21 for
//! 11..=13, r22 for 14..=30.

use std::fmt;

use serde::Serialize;

use crate::statistics::reduce::sorted_non_missing;

/// Added to a zero denominator.
const DENOMINATOR_EPSILON: f64 = 1e-9;

pub const MIN_SAMPLE: usize = 3;
pub const MAX_SAMPLE: usize = 30;

const R10_ALPHAS: [f64; 5] = [0.01, 0.02, 0.04, 0.05, 0.1];

/// r10 critical values for n = 3..=10, columns follow `R10_ALPHAS`.
const R10_TABLE: [(usize, [f64; 5]); 8] = [
    (3, [0.994, 0.988, 0.976, 0.970, 0.941]),
    (4, [0.926, 0.889, 0.846, 0.829, 0.765]),
    (5, [0.821, 0.780, 0.729, 0.710, 0.642]),
    (6, [0.740, 0.698, 0.644, 0.625, 0.560]),
    (7, [0.680, 0.637, 0.586, 0.568, 0.507]),
    (8, [0.634, 0.590, 0.543, 0.526, 0.468]),
    (9, [0.598, 0.555, 0.510, 0.493, 0.437]),
    (10, [0.568, 0.527, 0.483, 0.466, 0.412]),
];

const WIDE_ALPHAS: [f64; 8] = [0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2];

const R11_TABLE: [(usize, [f64; 8]); 3] = [
    (8, [0.799, 0.769, 0.724, 0.682, 0.633, 0.554, 0.480, 0.386]),
    (9, [0.750, 0.720, 0.675, 0.634, 0.586, 0.512, 0.441, 0.352]),
    (10, [0.713, 0.683, 0.637, 0.597, 0.551, 0.477, 0.409, 0.325]),
];

const R21_TABLE: [(usize, [f64; 8]); 3] = [
    (11, [0.770, 0.746, 0.708, 0.674, 0.636, 0.575, 0.518, 0.445]),
    (12, [0.739, 0.714, 0.676, 0.643, 0.605, 0.546, 0.489, 0.420]),
    (13, [0.713, 0.687, 0.649, 0.617, 0.580, 0.522, 0.467, 0.399]),
];

const R22_TABLE: [(usize, [f64; 8]); 9] = [
    (14, [0.732, 0.708, 0.672, 0.640, 0.603, 0.546, 0.491, 0.422]),
    (15, [0.708, 0.685, 0.648, 0.617, 0.582, 0.524, 0.470, 0.403]),
    (16, [0.691, 0.667, 0.630, 0.598, 0.562, 0.505, 0.453, 0.386]),
    (17, [0.671, 0.647, 0.611, 0.580, 0.545, 0.489, 0.437, 0.373]),
    (18, [0.652, 0.628, 0.594, 0.564, 0.529, 0.475, 0.424, 0.361]),
    (19, [0.640, 0.617, 0.581, 0.551, 0.517, 0.462, 0.412, 0.349]),
    (20, [0.627, 0.604, 0.568, 0.538, 0.503, 0.450, 0.401, 0.339]),
    (25, [0.574, 0.550, 0.517, 0.489, 0.457, 0.406, 0.359, 0.302]),
    (30, [0.539, 0.517, 0.484, 0.456, 0.425, 0.376, 0.332, 0.278]),
];

/// Ratio statistic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DixonVariant {
    R10,
    R11,
    R21,
    R22,
}

impl DixonVariant {
    /// Variant for a sample of `n` values, `None` outside `3..=30`.
    ///
    /// Three values are tested with r10 against the n = 3 row of the r10
    /// table, so the smallest supported disparity table (ALL plus two
    /// groups) still gets a Q label.
    pub fn for_sample_size(n: usize) -> Option<Self> {
        match n {
            3..=7 => Some(Self::R10),
            8..=10 => Some(Self::R11),
            11..=13 => Some(Self::R21),
            14..=30 => Some(Self::R22),
            _ => None,
        }
    }

    /// Gap and span indices (from each end) of the ratio: the gap runs from
    /// the extreme to the `gap`-th neighbour, the span from the extreme to
    /// the `span`-th value from the other end.
    fn offsets(&self) -> (usize, usize) {
        match self {
            Self::R10 => (1, 0),
            Self::R11 => (1, 1),
            Self::R21 => (2, 1),
            Self::R22 => (2, 2),
        }
    }

    /// Tabulated `(alpha, critical value)` pairs for n, ascending alpha.
    fn critical_values(&self, n: usize) -> Vec<(f64, f64)> {
        fn lookup<const K: usize>(
            table: &[(usize, [f64; K])],
            alphas: &[f64; K],
            n: usize,
        ) -> Vec<(f64, f64)> {
            table
                .iter()
                .rev()
                .find(|(size, _)| *size <= n)
                .map(|(_, row)| alphas.iter().copied().zip(row.iter().copied()).collect())
                .unwrap_or_default()
        }
        match self {
            Self::R10 => lookup(&R10_TABLE, &R10_ALPHAS, n),
            Self::R11 => lookup(&R11_TABLE, &WIDE_ALPHAS, n),
            Self::R21 => lookup(&R21_TABLE, &WIDE_ALPHAS, n),
            Self::R22 => lookup(&R22_TABLE, &WIDE_ALPHAS, n),
        }
    }
}

/// Result of the test, rendered as the disparity label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DixonOutcome {
    /// Significant at the given (lowest tabulated) alpha.
    Significant(f64),
    NotSignificant,
    NotApplicable,
}

impl fmt::Display for DixonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Significant(alpha) => write!(f, "significance at {alpha}"),
            Self::NotSignificant => f.write_str("not significance"),
            Self::NotApplicable => f.write_str("not applicable due to sample size"),
        }
    }
}

/// The larger of the low-tail and high-tail ratios for sorted data.
pub fn q_statistic(sorted: &[f64], variant: DixonVariant) -> f64 {
    let n = sorted.len();
    let (gap, span) = variant.offsets();
    let ratio = |numerator: f64, denominator: f64| {
        if denominator == 0.0 {
            numerator / (denominator + DENOMINATOR_EPSILON)
        } else {
            numerator / denominator
        }
    };
    let low = ratio(sorted[gap] - sorted[0], sorted[n - 1 - span] - sorted[0]);
    let high = ratio(sorted[n - 1] - sorted[n - 1 - gap], sorted[n - 1] - sorted[span]);
    low.max(high)
}

/// Run Dixon's Q test over the non-missing values.
pub fn dixon_q_test(values: &[f64]) -> DixonOutcome {
    let sorted = sorted_non_missing(values);
    let n = sorted.len();
    let Some(variant) = DixonVariant::for_sample_size(n) else {
        return DixonOutcome::NotApplicable;
    };
    let q = q_statistic(&sorted, variant);
    variant
        .critical_values(n)
        .into_iter()
        .find(|&(_, critical)| q > critical)
        .map_or(DixonOutcome::NotSignificant, |(alpha, _)| DixonOutcome::Significant(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_size_bounds() {
        assert_eq!(dixon_q_test(&[1.0, 2.0]), DixonOutcome::NotApplicable);
        assert_eq!(dixon_q_test(&[]), DixonOutcome::NotApplicable);
        let many: Vec<f64> = (0..31).map(f64::from).collect();
        assert_eq!(dixon_q_test(&many), DixonOutcome::NotApplicable);
        assert_eq!(
            DixonOutcome::NotApplicable.to_string(),
            "not applicable due to sample size"
        );
    }

    #[test]
    fn test_nan_does_not_count_toward_sample_size() {
        assert_eq!(dixon_q_test(&[1.0, 2.0, f64::NAN]), DixonOutcome::NotApplicable);
    }

    #[test]
    fn test_evenly_spaced_not_significant() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(dixon_q_test(&values), DixonOutcome::NotSignificant);
        assert_eq!(DixonOutcome::NotSignificant.to_string(), "not significance");
    }

    #[test]
    fn test_clear_high_outlier() {
        // r10 = (100 − 4) / (100 − 1) ≈ 0.97 > 0.926 at n = 4
        let values = [1.0, 2.0, 4.0, 100.0];
        assert_eq!(dixon_q_test(&values), DixonOutcome::Significant(0.01));
        assert_eq!(
            DixonOutcome::Significant(0.01).to_string(),
            "significance at 0.01"
        );
    }

    #[test]
    fn test_low_outlier_detected() {
        let values = [-50.0, 10.0, 10.5, 11.0, 11.2, 11.4];
        assert!(matches!(dixon_q_test(&values), DixonOutcome::Significant(_)));
    }

    #[test]
    fn test_constant_values_not_significant() {
        assert_eq!(dixon_q_test(&[0.5; 12]), DixonOutcome::NotSignificant);
    }

    #[test]
    fn test_r22_untabulated_size_uses_row_below() {
        let mut values: Vec<f64> = (0..22).map(|i| f64::from(i) * 0.1).collect();
        values.push(1000.0);
        values.push(1001.0);
        assert_eq!(DixonVariant::for_sample_size(values.len()), Some(DixonVariant::R22));
        assert_eq!(DixonVariant::R22.critical_values(24)[0], (0.001, 0.627));
        assert_eq!(dixon_q_test(&values), DixonOutcome::Significant(0.001));
    }

    #[test]
    fn test_three_values_use_r10_row_three() {
        // r10 = (10 − 0.01) / 10 = 0.999 > 0.994
        assert_eq!(dixon_q_test(&[0.0, 0.01, 10.0]), DixonOutcome::Significant(0.01));
        assert_eq!(dixon_q_test(&[0.0, 5.0, 10.0]), DixonOutcome::NotSignificant);
        assert_eq!(DixonVariant::R10.critical_values(3)[0], (0.01, 0.994));
    }

    #[test]
    fn test_variant_selection() {
        assert_eq!(DixonVariant::for_sample_size(3), Some(DixonVariant::R10));
        assert_eq!(DixonVariant::for_sample_size(7), Some(DixonVariant::R10));
        assert_eq!(DixonVariant::for_sample_size(8), Some(DixonVariant::R11));
        assert_eq!(DixonVariant::for_sample_size(13), Some(DixonVariant::R21));
        assert_eq!(DixonVariant::for_sample_size(30), Some(DixonVariant::R22));
        assert_eq!(DixonVariant::for_sample_size(31), None);
    }
}
