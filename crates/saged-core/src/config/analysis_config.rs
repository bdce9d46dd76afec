//! Analysis plan configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Knobs accepted by the statistic library. Each statistic reads only the
/// fields that apply to it and falls back to its own default otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StatisticOptions {
    /// Bin width for `mode`. Default: 0.5.
    pub bin_width: Option<f64>,
    /// Lower bound for quantile (0.25) / percentile (25) ranges.
    pub lower: Option<f64>,
    /// Upper bound for quantile (0.75) / percentile (75) ranges.
    pub upper: Option<f64>,
    /// Histogram bins for `kl_divergence`. Default: 10.
    pub bins: Option<usize>,
    /// Baseline generation override for paired statistics.
    pub baseline: Option<String>,
    /// Absolute tolerance for `precision`. Default: 0.
    pub tolerance: Option<f64>,
    /// Standard for `selection_rate`, e.g. "mean", "mode-0.2", "fixed=0.5".
    pub standard_by: Option<String>,
    /// Predicate for `selection_rate`, e.g. "larger", "within-range-0.1".
    pub selection_method: Option<String>,
    /// Correlation method: "pearson" | "spearman" | "kendall".
    pub method: Option<String>,
    /// Run the permutation significance test alongside the statistic.
    pub test: Option<bool>,
}

impl StatisticOptions {
    /// Returns whether significance testing was requested, defaulting to false.
    pub fn effective_test(&self) -> bool {
        self.test.unwrap_or(false)
    }
}

/// Which statistics to run, over which specification dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Grouping dimensions. Default: ["concept"].
    pub specifications: Option<Vec<String>>,
    /// Statistic names, applied in order.
    #[serde(default)]
    pub analyzers: Vec<String>,
    /// Per-statistic options keyed by statistic name.
    #[serde(default)]
    pub analyzer_configs: BTreeMap<String, StatisticOptions>,
}

impl AnalysisConfig {
    /// Returns the effective specifications, defaulting to ["concept"].
    pub fn effective_specifications(&self) -> Vec<String> {
        self.specifications
            .clone()
            .unwrap_or_else(|| vec!["concept".to_string()])
    }

    /// Options for the named statistic, or defaults.
    pub fn options_for(&self, name: &str) -> StatisticOptions {
        self.analyzer_configs.get(name).cloned().unwrap_or_default()
    }
}
