//! Selection rate relative to a standard computed over the whole table.

use std::str::FromStr;

use saged_core::errors::DiagnosisError;

use super::descriptive::{mean, median, mode, quantile};
use super::reduce::non_missing;

/// Bin width used by `mode` standards that do not name one.
const DEFAULT_MODE_WIDTH: f64 = 0.1;

/// How the per-column standard is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardBy {
    Mean,
    Median,
    /// Binned mode with the given bin width.
    Mode(f64),
    /// Quantile `q ∈ [0, 1]`.
    Quantile(f64),
    /// Percentile `p ∈ [0, 100]`.
    Percentile(f64),
    /// A fixed value, independent of the data.
    Fixed(f64),
}

impl StandardBy {
    /// The standard for one column, NaNs excluded.
    pub fn standard(&self, values: &[f64]) -> f64 {
        match *self {
            Self::Mean => mean(values),
            Self::Median => median(values),
            Self::Mode(width) => mode(values, width),
            Self::Quantile(q) => quantile(values, q),
            Self::Percentile(p) => quantile(values, p / 100.0),
            Self::Fixed(v) => v,
        }
    }
}

impl FromStr for StandardBy {
    type Err = DiagnosisError;

    /// `mean`, `median`, `mode` / `mode-<width>`, `quantile_range=<q>`,
    /// `percentile_range=<p>`, `fixed=<v>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |hint: &str| DiagnosisError::invalid_config("standard_by", format!("'{s}': {hint}"));
        match s {
            "mean" => return Ok(Self::Mean),
            "median" => return Ok(Self::Median),
            "mode" => return Ok(Self::Mode(DEFAULT_MODE_WIDTH)),
            _ => {}
        }
        if let Some(width) = s.strip_prefix("mode-") {
            let width = parse_number(width).ok_or_else(|| invalid("use 'mode-0.2'"))?;
            if width <= 0.0 {
                return Err(invalid("mode bin width must be positive"));
            }
            return Ok(Self::Mode(width));
        }
        if let Some(q) = s.strip_prefix("quantile_range=") {
            return parse_number(q)
                .filter(|q| (0.0..=1.0).contains(q))
                .map(Self::Quantile)
                .ok_or_else(|| invalid("use 'quantile_range=0.25' with a value in [0, 1]"));
        }
        if let Some(p) = s.strip_prefix("percentile_range=") {
            return parse_number(p)
                .filter(|p| (0.0..=100.0).contains(p))
                .map(Self::Percentile)
                .ok_or_else(|| invalid("use 'percentile_range=25' with a value in [0, 100]"));
        }
        if let Some(v) = s.strip_prefix("fixed=") {
            return parse_number(v)
                .map(Self::Fixed)
                .ok_or_else(|| invalid("use 'fixed=0.4'"));
        }
        Err(invalid(
            "use 'mean', 'median', 'mode-<width>', 'quantile_range=q', 'percentile_range=p' or 'fixed=v'",
        ))
    }
}

/// Which rows count as selected relative to the standard `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionMethod {
    /// `x ≥ s`
    Larger,
    /// `x ≤ s`
    Smaller,
    /// `|x − s| ≤ e`
    WithinRange(f64),
    /// `|x − s| ≤ p · s`
    WithinPercentage(f64),
}

impl SelectionMethod {
    pub fn selects(&self, x: f64, standard: f64) -> bool {
        match *self {
            Self::Larger => x >= standard,
            Self::Smaller => x <= standard,
            Self::WithinRange(e) => (x - standard).abs() <= e,
            Self::WithinPercentage(p) => (x - standard).abs() <= p * standard,
        }
    }
}

impl FromStr for SelectionMethod {
    type Err = DiagnosisError;

    /// `larger`, `smaller`, `within-range-<e>`, `within-percentage-<p>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |hint: &str| {
            DiagnosisError::invalid_config("selection_method", format!("'{s}': {hint}"))
        };
        match s {
            "larger" => Ok(Self::Larger),
            "smaller" => Ok(Self::Smaller),
            _ => {
                if let Some(e) = s.strip_prefix("within-range-") {
                    parse_number(e)
                        .map(Self::WithinRange)
                        .ok_or_else(|| invalid("use 'within-range-0.1'"))
                } else if let Some(p) = s.strip_prefix("within-percentage-") {
                    parse_number(p)
                        .map(Self::WithinPercentage)
                        .ok_or_else(|| invalid("use 'within-percentage-0.1'"))
                } else {
                    Err(invalid(
                        "use 'larger', 'smaller', 'within-range-e' or 'within-percentage-p'",
                    ))
                }
            }
        }
    }
}

/// Fraction of non-missing values selected relative to `standard`.
pub fn selection_rate(values: &[f64], standard: f64, method: SelectionMethod) -> f64 {
    let present = non_missing(values);
    if present.is_empty() {
        return f64::NAN;
    }
    let selected = present.iter().filter(|&&x| method.selects(x, standard)).count();
    selected as f64 / present.len() as f64
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_standard_larger() {
        let standard: StandardBy = "fixed=0.5".parse().unwrap();
        let values = [0.2, 0.6, 0.5, 0.9];
        let s = standard.standard(&values);
        assert_eq!(selection_rate(&values, s, SelectionMethod::Larger), 0.75);
    }

    #[test]
    fn test_standard_parsing() {
        assert_eq!("mode".parse::<StandardBy>().unwrap(), StandardBy::Mode(0.1));
        assert_eq!("mode-0.2".parse::<StandardBy>().unwrap(), StandardBy::Mode(0.2));
        assert_eq!(
            "quantile_range=0.25".parse::<StandardBy>().unwrap(),
            StandardBy::Quantile(0.25)
        );
        assert_eq!(
            "percentile_range=90".parse::<StandardBy>().unwrap(),
            StandardBy::Percentile(90.0)
        );
        for bad in ["average", "quantile_range=", "quantile_range=2", "fixed=x", "mode-0"] {
            assert!(bad.parse::<StandardBy>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_selection_method_parsing() {
        assert_eq!(
            "within-range-0.1".parse::<SelectionMethod>().unwrap(),
            SelectionMethod::WithinRange(0.1)
        );
        assert_eq!(
            "within-percentage-0.2".parse::<SelectionMethod>().unwrap(),
            SelectionMethod::WithinPercentage(0.2)
        );
        let err = "bigger".parse::<SelectionMethod>().unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_within_methods() {
        let values = [0.9, 1.0, 1.05, 1.5, f64::NAN];
        let rate = selection_rate(&values, 1.0, SelectionMethod::WithinRange(0.1));
        assert_eq!(rate, 0.75);
        let rate = selection_rate(&values, 1.0, SelectionMethod::WithinPercentage(0.5));
        assert_eq!(rate, 1.0);
        assert!(selection_rate(&[f64::NAN], 1.0, SelectionMethod::Larger).is_nan());
    }
}
