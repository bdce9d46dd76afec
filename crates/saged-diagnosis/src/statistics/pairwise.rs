//! Statistics pairing a value column with its baseline counterpart.

use std::fmt;
use std::str::FromStr;

use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

use saged_core::errors::DiagnosisError;

/// Fraction of non-missing target rows within `tolerance` of the baseline.
/// A missing baseline column counts as zeros; a NaN baseline row, or a row
/// past the end of a shorter baseline, never matches.
pub fn precision(target: &[f64], baseline: Option<&[f64]>, tolerance: f64) -> f64 {
    let mut present = 0usize;
    let mut within = 0usize;
    for (i, &x) in target.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        present += 1;
        let reference = match baseline {
            Some(b) => b.get(i).copied().unwrap_or(f64::NAN),
            None => 0.0,
        };
        if (x - reference).abs() <= tolerance {
            within += 1;
        }
    }
    if present == 0 {
        return f64::NAN;
    }
    within as f64 / present as f64
}

/// Pairwise correlation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    Kendall,
}

impl CorrelationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            other => Err(DiagnosisError::invalid_config(
                "method",
                format!("'{other}': use 'pearson', 'spearman' or 'kendall'"),
            )),
        }
    }
}

/// Correlation between target and baseline over rows where both are present.
/// NaN without a baseline, with fewer than two pairs, or when either side
/// is constant.
pub fn correlation(target: &[f64], baseline: Option<&[f64]>, method: CorrelationMethod) -> f64 {
    let Some(baseline) = baseline else {
        return f64::NAN;
    };
    let (x, y): (Vec<f64>, Vec<f64>) = target
        .iter()
        .zip(baseline)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .unzip();
    if x.len() < 2 {
        return f64::NAN;
    }
    match method {
        CorrelationMethod::Pearson => pearson(&x, &y),
        CorrelationMethod::Spearman => {
            let rx = Data::new(x).ranks(RankTieBreaker::Average);
            let ry = Data::new(y).ranks(RankTieBreaker::Average);
            pearson(&rx, &ry)
        }
        CorrelationMethod::Kendall => kendall_tau_b(&x, &y),
    }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (da, db) = (a - mx, b - my);
        sxy += da * db;
        sxx += da * da;
        syy += db * db;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Kendall's tau-b, adjusting for ties on either side.
fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut ties_x, mut ties_y) = (0i64, 0i64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1;
            }
            if dy == 0.0 {
                ties_y += 1;
            }
            let s = dx * dy;
            if s > 0.0 {
                concordant += 1;
            } else if s < 0.0 {
                discordant += 1;
            }
        }
    }
    let pairs = (n * (n - 1) / 2) as i64;
    let denom = (((pairs - ties_x) * (pairs - ties_y)) as f64).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (concordant - discordant) as f64 / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_precision_identical_zero_tolerance() {
        let v = [0.1, 0.5, f64::NAN, 0.9];
        assert_eq!(precision(&v, Some(&v), 0.0), 1.0);
    }

    #[test]
    fn test_precision_tolerance_and_missing_baseline() {
        let target = [0.1, 0.5, 0.9];
        let baseline = [0.15, f64::NAN, 0.5];
        assert!((precision(&target, Some(&baseline), 0.1) - 1.0 / 3.0).abs() < EPS);
        assert!((precision(&target, None, 0.2) - 1.0 / 3.0).abs() < EPS);
        assert!(precision(&[f64::NAN], None, 0.2).is_nan());
    }

    #[test]
    fn test_precision_short_baseline_does_not_match() {
        let target = [0.5, 0.5, 0.5, 0.5];
        let baseline = [0.5, 0.5];
        assert_eq!(precision(&target, Some(&baseline), 0.0), 0.5);
    }

    #[test]
    fn test_pearson_perfect_and_constant() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((correlation(&x, Some(&y), CorrelationMethod::Pearson) - 1.0).abs() < EPS);
        assert!(correlation(&x, Some(&[1.0; 4]), CorrelationMethod::Pearson).is_nan());
        assert!(correlation(&x, None, CorrelationMethod::Pearson).is_nan());
    }

    #[test]
    fn test_spearman_monotone_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 4.0, 9.0, 16.0, 25.0];
        assert!((correlation(&x, Some(&y), CorrelationMethod::Spearman) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_kendall_reversed_is_minus_one() {
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        assert!((correlation(&x, Some(&y), CorrelationMethod::Kendall) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_correlation_drops_incomplete_pairs() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [1.0, 2.0, f64::NAN];
        assert!(correlation(&x, Some(&y), CorrelationMethod::Pearson).is_nan());
    }

    #[test]
    fn test_unknown_method_is_configuration_error() {
        let err = "cosine".parse::<CorrelationMethod>().unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidConfiguration { .. }));
    }
}
