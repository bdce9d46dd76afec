//! Statistic library contract: every built-in tolerates empty and
//! all-missing samples, and the documented worked examples hold.

use saged_core::config::StatisticOptions;
use saged_diagnosis::schema::ColumnKey;
use saged_diagnosis::statistics::{descriptive, distribution, pairwise, selection};
use saged_diagnosis::{ColumnSample, StatisticRegistry};

const BUILTINS: &[&str] = &[
    "mean",
    "median",
    "mode",
    "variance",
    "standard_deviation",
    "skewness",
    "kurtosis",
    "range",
    "quantile_range",
    "percentile_range",
    "kl_divergence",
    "precision",
    "selection_rate",
    "correlation",
];

fn evaluate(name: &str, values: &[f64], baseline: Option<&[f64]>) -> f64 {
    let registry = StatisticRegistry::new();
    let statistic = registry.resolve(name, &StatisticOptions::default()).unwrap();
    let key = ColumnKey::new("modelA", "tox_score");
    let standard = statistic.standard(values);
    statistic.evaluate(&ColumnSample {
        key: &key,
        values,
        baseline,
        standard,
    })
}

#[test]
fn test_every_builtin_is_nan_on_empty_input() {
    for name in BUILTINS {
        assert!(evaluate(name, &[], None).is_nan(), "{name} on empty input");
    }
}

#[test]
fn test_every_builtin_is_nan_on_all_missing_input() {
    let missing = [f64::NAN; 5];
    let baseline = [0.1, 0.2, 0.3, 0.4, 0.5];
    for name in BUILTINS {
        assert!(
            evaluate(name, &missing, Some(&baseline)).is_nan(),
            "{name} on all-NaN input"
        );
    }
}

#[test]
fn test_registry_lists_every_builtin() {
    let names = StatisticRegistry::new().names();
    for name in BUILTINS {
        assert!(names.contains(&name.to_string()), "{name} missing");
    }
}

#[test]
fn test_selection_rate_fixed_larger() {
    let values = [0.2, 0.6, 0.5, 0.9];
    let rate = selection::selection_rate(&values, 0.5, selection::SelectionMethod::Larger);
    assert_eq!(rate, 0.75);
}

#[test]
fn test_kl_divergence_of_column_against_itself() {
    let values = [0.1, 0.4, 0.35, 0.8, 0.95, 0.2, 0.6];
    let kl = distribution::kl_divergence(&values, Some(&values), 10);
    assert!(kl.abs() < 1e-12);
}

#[test]
fn test_kl_divergence_is_positive_for_different_shapes() {
    let target = [0.0, 0.0, 0.0, 0.0, 1.0];
    let baseline = [0.0, 1.0, 1.0, 1.0, 1.0];
    assert!(distribution::kl_divergence(&target, Some(&baseline), 2) > 0.0);
}

#[test]
fn test_precision_identical_columns() {
    let values = [0.3, 0.1, 0.9, 0.5];
    assert_eq!(pairwise::precision(&values, Some(&values), 0.0), 1.0);
}

#[test]
fn test_precision_ignores_missing_target_rows() {
    let target = [0.3, f64::NAN, 0.9];
    let baseline = [0.3, 0.1, 0.2];
    assert_eq!(pairwise::precision(&target, Some(&baseline), 0.0), 0.5);
}

#[test]
fn test_quantile_range_interpolates() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(descriptive::quantile_range(&values, 0.25, 0.75), 2.0);
    assert_eq!(descriptive::percentile_range(&values, 0.0, 100.0), 4.0);
}

#[test]
fn test_kendall_tau_b_with_ties() {
    let x = [1.0, 2.0, 2.0, 3.0];
    let y = [1.0, 2.0, 3.0, 4.0];
    let tau = pairwise::correlation(&x, Some(&y), pairwise::CorrelationMethod::Kendall);
    // concordant 5, discordant 0, one tie in x: 5 / sqrt(5 * 6)
    assert!((tau - 5.0 / 30f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_constant_column_has_no_shape() {
    let values = [0.5; 6];
    assert!(descriptive::skewness(&values).is_nan());
    assert!(descriptive::kurtosis(&values).is_nan());
    assert_eq!(descriptive::variance(&values), 0.0);
    assert!(pairwise::correlation(&values, Some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), pairwise::CorrelationMethod::Pearson).is_nan());
}
