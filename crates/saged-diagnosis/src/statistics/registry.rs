//! Name → statistic registry: the built-in catalog plus user registrations.

use saged_core::config::StatisticOptions;
use saged_core::errors::DiagnosisError;
use saged_core::types::collections::FxHashMap;

use super::kind::{CustomStatistic, Statistic, StatisticKind};
use super::pairwise::CorrelationMethod;
use super::selection::{SelectionMethod, StandardBy};

/// Builds a built-in statistic from its options, validating them.
pub type BuiltinConstructor = fn(&StatisticOptions) -> Result<StatisticKind, DiagnosisError>;

const DEFAULT_BIN_WIDTH: f64 = 0.5;
const DEFAULT_QUANTILE: (f64, f64) = (0.25, 0.75);
const DEFAULT_PERCENTILE: (f64, f64) = (25.0, 75.0);
const DEFAULT_BINS: usize = 10;
const DEFAULT_STANDARD_BY: &str = "mean";
const DEFAULT_SELECTION_METHOD: &str = "larger";
const DEFAULT_CORRELATION: &str = "pearson";

/// Built-in statistics by canonical name.
const BUILTINS: &[(&str, BuiltinConstructor)] = &[
    ("mean", build_mean),
    ("median", build_median),
    ("mode", build_mode),
    ("variance", build_variance),
    ("standard_deviation", build_standard_deviation),
    ("skewness", build_skewness),
    ("kurtosis", build_kurtosis),
    ("range", build_range),
    ("quantile_range", build_quantile_range),
    ("percentile_range", build_percentile_range),
    ("kl_divergence", build_kl_divergence),
    ("precision", build_precision),
    ("selection_rate", build_selection_rate),
    ("correlation", build_correlation),
];

/// Short names accepted in analysis plans.
const ALIASES: &[(&str, &str)] = &[
    ("std", "standard_deviation"),
    ("var", "variance"),
    ("kl", "kl_divergence"),
    ("sr", "selection_rate"),
];

macro_rules! unit_constructor {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            fn $name(_: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
                Ok(StatisticKind::$kind)
            }
        )*
    };
}

unit_constructor! {
    build_mean => Mean,
    build_median => Median,
    build_variance => Variance,
    build_standard_deviation => StandardDeviation,
    build_skewness => Skewness,
    build_kurtosis => Kurtosis,
    build_range => Range,
}

fn build_mode(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let bin_width = options.bin_width.unwrap_or(DEFAULT_BIN_WIDTH);
    if bin_width.is_nan() || bin_width <= 0.0 {
        return Err(DiagnosisError::invalid_config("bin_width", "must be positive"));
    }
    Ok(StatisticKind::Mode { bin_width })
}

fn bounds(
    options: &StatisticOptions,
    default: (f64, f64),
    max: f64,
) -> Result<(f64, f64), DiagnosisError> {
    let lower = options.lower.unwrap_or(default.0);
    let upper = options.upper.unwrap_or(default.1);
    let in_range = |v: f64| (0.0..=max).contains(&v);
    if !in_range(lower) || !in_range(upper) {
        return Err(DiagnosisError::invalid_config(
            "lower/upper",
            format!("bounds must lie in [0, {max}]"),
        ));
    }
    Ok((lower, upper))
}

fn build_quantile_range(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let (lower, upper) = bounds(options, DEFAULT_QUANTILE, 1.0)?;
    Ok(StatisticKind::QuantileRange { lower, upper })
}

fn build_percentile_range(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let (lower, upper) = bounds(options, DEFAULT_PERCENTILE, 100.0)?;
    Ok(StatisticKind::PercentileRange { lower, upper })
}

fn build_kl_divergence(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let bins = options.bins.unwrap_or(DEFAULT_BINS);
    if bins == 0 {
        return Err(DiagnosisError::invalid_config("bins", "must be greater than 0"));
    }
    Ok(StatisticKind::KlDivergence {
        baseline: options.baseline.clone(),
        bins,
    })
}

fn build_precision(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let tolerance = options.tolerance.unwrap_or(0.0);
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(DiagnosisError::invalid_config("tolerance", "must be non-negative"));
    }
    Ok(StatisticKind::Precision {
        baseline: options.baseline.clone(),
        tolerance,
    })
}

fn build_selection_rate(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let standard = options
        .standard_by
        .clone()
        .unwrap_or_else(|| DEFAULT_STANDARD_BY.to_string());
    let method = options
        .selection_method
        .clone()
        .unwrap_or_else(|| DEFAULT_SELECTION_METHOD.to_string());
    Ok(StatisticKind::SelectionRate {
        standard_by: standard.parse::<StandardBy>()?,
        selection_method: method.parse::<SelectionMethod>()?,
        labels: (standard, method),
    })
}

fn build_correlation(options: &StatisticOptions) -> Result<StatisticKind, DiagnosisError> {
    let method = options.method.as_deref().unwrap_or(DEFAULT_CORRELATION);
    Ok(StatisticKind::Correlation {
        baseline: options.baseline.clone(),
        method: method.parse::<CorrelationMethod>()?,
    })
}

/// Resolves statistic names from analysis plans.
#[derive(Debug, Clone)]
pub struct StatisticRegistry {
    builtins: FxHashMap<&'static str, BuiltinConstructor>,
    aliases: FxHashMap<&'static str, &'static str>,
    custom: FxHashMap<String, CustomStatistic>,
}

impl StatisticRegistry {
    pub fn new() -> Self {
        Self {
            builtins: BUILTINS.iter().copied().collect(),
            aliases: ALIASES.iter().copied().collect(),
            custom: FxHashMap::default(),
        }
    }

    fn canonical<'a>(&self, name: &'a str) -> &'a str {
        self.aliases.get(name).copied().unwrap_or(name)
    }

    /// Resolve a name (or alias) with its options into a statistic.
    pub fn resolve(
        &self,
        name: &str,
        options: &StatisticOptions,
    ) -> Result<Statistic, DiagnosisError> {
        let canonical = self.canonical(name);
        if let Some(build) = self.builtins.get(canonical) {
            return build(options).map(Statistic::Builtin);
        }
        self.custom
            .get(name)
            .cloned()
            .map(Statistic::Custom)
            .ok_or_else(|| DiagnosisError::UnknownStatistic {
                name: name.to_string(),
            })
    }

    /// Register a user statistic under its own name. Built-in names and
    /// aliases cannot be shadowed; re-registering a custom name replaces it.
    pub fn register_custom(&mut self, statistic: CustomStatistic) -> Result<(), DiagnosisError> {
        let name = statistic.name.as_str();
        if name.is_empty() {
            return Err(DiagnosisError::invalid_config("name", "must not be empty"));
        }
        if self.builtins.contains_key(name) || self.aliases.contains_key(name) {
            return Err(DiagnosisError::invalid_config(
                "name",
                format!("'{name}' is a built-in statistic"),
            ));
        }
        self.custom.insert(statistic.name.clone(), statistic);
        Ok(())
    }

    /// Whether a name (or alias) resolves to something.
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(self.canonical(name)) || self.custom.contains_key(name)
    }

    /// Every resolvable canonical name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .builtins
            .keys()
            .map(|n| n.to_string())
            .chain(self.custom.keys().cloned())
            .collect();
        names.sort();
        names
    }
}

impl Default for StatisticRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_builtins() {
        let registry = StatisticRegistry::new();
        let std = registry.resolve("std", &StatisticOptions::default()).unwrap();
        assert_eq!(std.name("baseline"), "standard_deviation");
        let sr = registry.resolve("sr", &StatisticOptions::default()).unwrap();
        assert_eq!(sr.name("baseline"), "sr_larger_sd_mean");
    }

    #[test]
    fn test_unknown_name() {
        let registry = StatisticRegistry::new();
        let err = registry.resolve("geometric_mean", &StatisticOptions::default()).unwrap_err();
        assert_eq!(
            err,
            DiagnosisError::UnknownStatistic {
                name: "geometric_mean".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let registry = StatisticRegistry::new();
        let zero_bins = StatisticOptions {
            bins: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            registry.resolve("kl_divergence", &zero_bins),
            Err(DiagnosisError::InvalidConfiguration { .. })
        ));
        let bad_standard = StatisticOptions {
            standard_by: Some("geometric".to_string()),
            ..Default::default()
        };
        assert!(registry.resolve("selection_rate", &bad_standard).is_err());
        let bad_quantile = StatisticOptions {
            upper: Some(1.5),
            ..Default::default()
        };
        assert!(registry.resolve("quantile_range", &bad_quantile).is_err());
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = StatisticRegistry::new();
        registry
            .register_custom(CustomStatistic::new("count", false, |s| {
                s.values.iter().filter(|v| !v.is_nan()).count() as f64
            }))
            .unwrap();
        assert!(registry.contains("count"));
        let stat = registry.resolve("count", &StatisticOptions::default()).unwrap();
        assert_eq!(stat.name("baseline"), "count");

        let shadow = CustomStatistic::new("mean", false, |_| 0.0);
        assert!(registry.register_custom(shadow).is_err());
        assert!(registry.names().contains(&"count".to_string()));
    }
}
