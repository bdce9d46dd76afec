//! Statistic descriptors: what to compute and how to name the result.

use std::fmt;
use std::sync::Arc;

use crate::schema::ColumnKey;

use super::descriptive;
use super::distribution::kl_divergence;
use super::pairwise::{correlation, precision, CorrelationMethod};
use super::selection::{selection_rate, SelectionMethod, StandardBy};

/// Everything a statistic sees for one value column within one group.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSample<'a> {
    pub key: &'a ColumnKey,
    /// Group rows of the value column; NaN marks a missing score.
    pub values: &'a [f64],
    /// The same rows of the paired baseline column, when it exists.
    pub baseline: Option<&'a [f64]>,
    /// Standard computed once over the whole table, NaN when unused.
    pub standard: f64,
}

/// User-supplied aggregation with the same contract as the built-ins.
pub type CustomFn = Arc<dyn Fn(&ColumnSample<'_>) -> f64 + Send + Sync>;

/// A named user-supplied statistic.
#[derive(Clone)]
pub struct CustomStatistic {
    pub name: String,
    pub func: CustomFn,
    /// Whether the function reads `ColumnSample::baseline`.
    pub paired: bool,
}

impl CustomStatistic {
    pub fn new<F>(name: impl Into<String>, paired: bool, func: F) -> Self
    where
        F: Fn(&ColumnSample<'_>) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
            paired,
        }
    }
}

impl fmt::Debug for CustomStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomStatistic")
            .field("name", &self.name)
            .field("paired", &self.paired)
            .finish_non_exhaustive()
    }
}

/// The built-in statistic catalog, with options already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticKind {
    Mean,
    Median,
    Mode { bin_width: f64 },
    Variance,
    StandardDeviation,
    Skewness,
    Kurtosis,
    Range,
    QuantileRange { lower: f64, upper: f64 },
    PercentileRange { lower: f64, upper: f64 },
    KlDivergence { baseline: Option<String>, bins: usize },
    Precision { baseline: Option<String>, tolerance: f64 },
    SelectionRate {
        standard_by: StandardBy,
        selection_method: SelectionMethod,
        /// The option strings as given, used for naming.
        labels: (String, String),
    },
    Correlation { baseline: Option<String>, method: CorrelationMethod },
}

/// A resolved statistic: built-in or user-supplied.
#[derive(Debug, Clone)]
pub enum Statistic {
    Builtin(StatisticKind),
    Custom(CustomStatistic),
}

impl Statistic {
    /// Cache key of the summary table this statistic produces.
    pub fn name(&self, default_baseline: &str) -> String {
        let kind = match self {
            Self::Custom(c) => return c.name.clone(),
            Self::Builtin(kind) => kind,
        };
        match kind {
            StatisticKind::Mean => "mean".to_string(),
            StatisticKind::Median => "median".to_string(),
            StatisticKind::Mode { .. } => "mode".to_string(),
            StatisticKind::Variance => "variance".to_string(),
            StatisticKind::StandardDeviation => "standard_deviation".to_string(),
            StatisticKind::Skewness => "skewness".to_string(),
            StatisticKind::Kurtosis => "kurtosis".to_string(),
            StatisticKind::Range => "range".to_string(),
            StatisticKind::QuantileRange { lower, upper } => format!("quantile_{lower}_{upper}"),
            StatisticKind::PercentileRange { lower, upper } => {
                format!("percentile_{lower}_{upper}")
            }
            StatisticKind::KlDivergence { baseline, bins } => format!(
                "kl_divergence_wrt_{}_bin_{bins}",
                baseline.as_deref().unwrap_or(default_baseline)
            ),
            StatisticKind::Precision {
                baseline,
                tolerance,
            } => format!(
                "precision_wrt_{}_tolerance_{tolerance}",
                baseline.as_deref().unwrap_or(default_baseline)
            ),
            StatisticKind::SelectionRate { labels, .. } => {
                format!("sr_{}_sd_{}", labels.1, labels.0)
            }
            StatisticKind::Correlation { baseline, method } => format!(
                "correlation_wrt_{}_method_{method}",
                baseline.as_deref().unwrap_or(default_baseline)
            ),
        }
    }

    /// The baseline generation this statistic pairs each column with, if any.
    pub fn baseline<'a>(&'a self, default_baseline: &'a str) -> Option<&'a str> {
        match self {
            Self::Custom(c) => c.paired.then_some(default_baseline),
            Self::Builtin(
                StatisticKind::KlDivergence { baseline, .. }
                | StatisticKind::Precision { baseline, .. }
                | StatisticKind::Correlation { baseline, .. },
            ) => Some(baseline.as_deref().unwrap_or(default_baseline)),
            Self::Builtin(_) => None,
        }
    }

    /// Whether a per-column standard must be computed before grouping.
    pub fn needs_standard(&self) -> bool {
        matches!(self, Self::Builtin(StatisticKind::SelectionRate { .. }))
    }

    /// The standard for one whole-table column, NaN when unused.
    pub fn standard(&self, column: &[f64]) -> f64 {
        match self {
            Self::Builtin(StatisticKind::SelectionRate { standard_by, .. }) => {
                standard_by.standard(column)
            }
            _ => f64::NAN,
        }
    }

    /// Evaluate on one group's sample. NaN when every value is missing.
    pub fn evaluate(&self, sample: &ColumnSample<'_>) -> f64 {
        if sample.values.iter().all(|v| v.is_nan()) {
            return f64::NAN;
        }
        let v = sample.values;
        let kind = match self {
            Self::Custom(c) => return (c.func)(sample),
            Self::Builtin(kind) => kind,
        };
        match kind {
            StatisticKind::Mean => descriptive::mean(v),
            StatisticKind::Median => descriptive::median(v),
            StatisticKind::Mode { bin_width } => descriptive::mode(v, *bin_width),
            StatisticKind::Variance => descriptive::variance(v),
            StatisticKind::StandardDeviation => descriptive::standard_deviation(v),
            StatisticKind::Skewness => descriptive::skewness(v),
            StatisticKind::Kurtosis => descriptive::kurtosis(v),
            StatisticKind::Range => descriptive::range(v),
            StatisticKind::QuantileRange { lower, upper } => {
                descriptive::quantile_range(v, *lower, *upper)
            }
            StatisticKind::PercentileRange { lower, upper } => {
                descriptive::percentile_range(v, *lower, *upper)
            }
            StatisticKind::KlDivergence { bins, .. } => kl_divergence(v, sample.baseline, *bins),
            StatisticKind::Precision { tolerance, .. } => precision(v, sample.baseline, *tolerance),
            StatisticKind::SelectionRate {
                selection_method, ..
            } => selection_rate(v, sample.standard, *selection_method),
            StatisticKind::Correlation { method, .. } => correlation(v, sample.baseline, *method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<'a>(key: &'a ColumnKey, values: &'a [f64]) -> ColumnSample<'a> {
        ColumnSample {
            key,
            values,
            baseline: None,
            standard: f64::NAN,
        }
    }

    #[test]
    fn test_generated_names() {
        let sr = Statistic::Builtin(StatisticKind::SelectionRate {
            standard_by: StandardBy::Mean,
            selection_method: SelectionMethod::Larger,
            labels: ("mean".to_string(), "larger".to_string()),
        });
        assert_eq!(sr.name("baseline"), "sr_larger_sd_mean");

        let kl = Statistic::Builtin(StatisticKind::KlDivergence {
            baseline: None,
            bins: 10,
        });
        assert_eq!(kl.name("baseline"), "kl_divergence_wrt_baseline_bin_10");

        let q = Statistic::Builtin(StatisticKind::QuantileRange {
            lower: 0.25,
            upper: 0.75,
        });
        assert_eq!(q.name("baseline"), "quantile_0.25_0.75");

        let p = Statistic::Builtin(StatisticKind::Precision {
            baseline: Some("ref".to_string()),
            tolerance: 0.0,
        });
        assert_eq!(p.name("baseline"), "precision_wrt_ref_tolerance_0");
    }

    #[test]
    fn test_custom_never_sees_all_missing_group() {
        let key = ColumnKey::new("modelA", "tox_score");
        let custom = Statistic::Custom(CustomStatistic::new("first", false, |s| s.values[0]));
        assert!(custom.evaluate(&sample(&key, &[f64::NAN])).is_nan());
        assert!(custom.evaluate(&sample(&key, &[])).is_nan());
        assert_eq!(custom.evaluate(&sample(&key, &[0.4, 0.2])), 0.4);
    }

    #[test]
    fn test_baseline_pairing() {
        let corr = Statistic::Builtin(StatisticKind::Correlation {
            baseline: None,
            method: CorrelationMethod::Pearson,
        });
        assert_eq!(corr.baseline("baseline"), Some("baseline"));
        assert_eq!(Statistic::Builtin(StatisticKind::Mean).baseline("baseline"), None);
    }
}
