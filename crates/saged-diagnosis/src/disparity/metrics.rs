//! Spread and outlier diagnostics across the rows of a summary table.

use statrs::statistics::Statistics;

use super::dixon::dixon_q_test;
use super::types::{DisparityMetric, DisparityRow, DisparityTable, DisparityValue};
use crate::aggregation::{SummaryRow, SummaryTable};
use crate::statistics::descriptive::mean;
use crate::statistics::reduce::non_missing;

/// The eight diagnostics of one value column, in `DisparityMetric::ALL`
/// order.
pub fn column_disparity(rows: &[SummaryRow], column: usize) -> [DisparityValue; 8] {
    let values: Vec<f64> = rows.iter().map(|r| r.values[column]).collect();
    let present = non_missing(&values);

    let max_row = extreme_row(&values, |candidate, best| candidate > best);
    let min_row = extreme_row(&values, |candidate, best| candidate < best);
    let descriptor = |row: Option<usize>, fallback: &str| match row {
        Some(i) => {
            let [concept, domain, source_tag] = rows[i].key.values();
            DisparityValue::Label(format!("({concept},{domain},{source_tag}: {:?})", values[i]))
        }
        None => DisparityValue::Label(fallback.to_string()),
    };

    let (max, min) = match (max_row, min_row) {
        (Some(hi), Some(lo)) => (values[hi], values[lo]),
        _ => (f64::NAN, f64::NAN),
    };
    let min_over_max = if max == 0.0 { f64::NAN } else { min / max };

    [
        descriptor(max_row, "No data available for max value."),
        descriptor(min_row, "No data available for min value."),
        DisparityValue::Number(min_over_max),
        DisparityValue::Number(max - min),
        DisparityValue::Number(mean(&present)),
        DisparityValue::Number(sample_std(&present)),
        DisparityValue::Number(max_z_score(&present)),
        DisparityValue::Label(dixon_q_test(&present).to_string()),
    ]
}

/// Index of the first row holding the extreme non-missing value.
fn extreme_row(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.map_or(true, |b| better(v, values[b])) {
            best = Some(i);
        }
    }
    best
}

/// Sample standard deviation (n − 1); NaN below two values.
fn sample_std(present: &[f64]) -> f64 {
    if present.len() < 2 {
        return f64::NAN;
    }
    present.iter().std_dev()
}

/// Largest `(x − mean) / σ` with population σ; NaN when σ is zero.
fn max_z_score(present: &[f64]) -> f64 {
    if present.is_empty() {
        return f64::NAN;
    }
    let center = mean(present);
    let sd = present.iter().population_std_dev();
    if sd.is_nan() || sd <= 0.0 {
        return f64::NAN;
    }
    present
        .iter()
        .map(|x| (x - center) / sd)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Disparity rows for one summary table.
pub fn summary_disparity(summary: &SummaryTable, value_columns: &[String]) -> Vec<DisparityRow> {
    let per_column: Vec<Option<[DisparityValue; 8]>> = value_columns
        .iter()
        .map(|c| summary.column_index(c).map(|idx| column_disparity(&summary.rows, idx)))
        .collect();

    DisparityMetric::ALL
        .iter()
        .enumerate()
        .map(|(m, metric)| DisparityRow {
            statistic: summary.name.clone(),
            metric: *metric,
            values: per_column
                .iter()
                .map(|col| match col {
                    Some(values) => values[m].clone(),
                    None => DisparityValue::Number(f64::NAN),
                })
                .collect(),
        })
        .collect()
}

/// Stack the disparity rows of every summary, in the given order.
pub fn compute_disparity<'a>(
    summaries: impl IntoIterator<Item = &'a SummaryTable>,
    value_columns: &[String],
) -> DisparityTable {
    let rows = summaries
        .into_iter()
        .flat_map(|summary| summary_disparity(summary, value_columns))
        .collect();
    DisparityTable {
        value_columns: value_columns.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saged_core::types::collections::DimensionVec;
    use saged_core::types::{Dimension, ALL_SENTINEL};

    use crate::aggregation::GroupKey;

    fn row(concept: &str, value: f64) -> SummaryRow {
        SummaryRow {
            key: GroupKey::new([
                concept.to_string(),
                ALL_SENTINEL.to_string(),
                ALL_SENTINEL.to_string(),
            ]),
            grouped: DimensionVec::new(),
            values: vec![value],
            p_values: None,
        }
    }

    fn summary(values: &[(&str, f64)]) -> SummaryTable {
        SummaryTable {
            name: "mean".to_string(),
            specifications: vec![Dimension::Concept],
            value_columns: vec!["modelA_tox_score".to_string()],
            rows: values.iter().map(|(c, v)| row(c, *v)).collect(),
        }
    }

    #[test]
    fn test_constant_column() {
        let s = summary(&[("ALL", 0.4), ("A", 0.4), ("B", 0.4)]);
        let d = column_disparity(&s.rows, 0);
        assert_eq!(d[2], DisparityValue::Number(1.0));
        assert_eq!(d[3], DisparityValue::Number(0.0));
        assert!(d[6].as_number().unwrap().is_nan());
        assert_eq!(d[7].as_label(), Some("not significance"));
    }

    #[test]
    fn test_descriptors() {
        let s = summary(&[("ALL", 0.5), ("A", 0.25), ("B", 1.0)]);
        let d = column_disparity(&s.rows, 0);
        assert_eq!(d[0].as_label(), Some("(B,ALL,ALL: 1.0)"));
        assert_eq!(d[1].as_label(), Some("(A,ALL,ALL: 0.25)"));
        assert_eq!(d[2], DisparityValue::Number(0.25));
        assert_eq!(d[3], DisparityValue::Number(0.75));
    }

    #[test]
    fn test_no_data() {
        let s = summary(&[("ALL", f64::NAN), ("A", f64::NAN)]);
        let d = column_disparity(&s.rows, 0);
        assert_eq!(d[0].as_label(), Some("No data available for max value."));
        assert_eq!(d[1].as_label(), Some("No data available for min value."));
        assert!(d[4].as_number().unwrap().is_nan());
        assert_eq!(d[7].as_label(), Some("not applicable due to sample size"));
    }

    #[test]
    fn test_zero_max_gives_nan_ratio() {
        let s = summary(&[("ALL", -1.0), ("A", 0.0)]);
        let d = column_disparity(&s.rows, 0);
        assert!(d[2].as_number().unwrap().is_nan());
    }

    #[test]
    fn test_std_and_z_score() {
        let s = summary(&[("ALL", 1.0), ("A", 2.0), ("B", 3.0)]);
        let d = column_disparity(&s.rows, 0);
        assert!((d[4].as_number().unwrap() - 2.0).abs() < 1e-12);
        assert!((d[5].as_number().unwrap() - 1.0).abs() < 1e-12);
        // population σ = sqrt(2/3)
        let z = 1.0 / (2.0f64 / 3.0).sqrt();
        assert!((d[6].as_number().unwrap() - z).abs() < 1e-12);
    }

    #[test]
    fn test_stacking() {
        let a = summary(&[("ALL", 0.5), ("A", 0.25)]);
        let mut b = a.clone();
        b.name = "median".to_string();
        let columns = vec!["modelA_tox_score".to_string(), "absent_tox_score".to_string()];
        let table = compute_disparity([&a, &b], &columns);
        assert_eq!(table.n_rows(), 16);
        assert_eq!(table.rows[8].statistic, "median");
        assert_eq!(table.rows[8].metric, DisparityMetric::Max);
        let absent = table.get("mean", DisparityMetric::Avg, "absent_tox_score").unwrap();
        assert!(absent.as_number().unwrap().is_nan());
    }
}
