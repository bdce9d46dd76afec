//! Disparity table types.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::aggregation::types::number;

/// Cross-group diagnostics computed per value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisparityMetric {
    Max,
    Min,
    MinOverMax,
    MaxMinusMin,
    Avg,
    Std,
    MaxZScore,
    DixonQ,
}

impl DisparityMetric {
    /// Every metric, in output order.
    pub const ALL: [DisparityMetric; 8] = [
        Self::Max,
        Self::Min,
        Self::MinOverMax,
        Self::MaxMinusMin,
        Self::Avg,
        Self::Std,
        Self::MaxZScore,
        Self::DixonQ,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Max => "Max",
            Self::Min => "Min",
            Self::MinOverMax => "Min/Max",
            Self::MaxMinusMin => "Max-Min",
            Self::Avg => "Avg",
            Self::Std => "Std",
            Self::MaxZScore => "Max Z-Score",
            Self::DixonQ => "Dixon Q",
        }
    }
}

impl fmt::Display for DisparityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A disparity cell: a number, or a descriptor/label string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisparityValue {
    Number(f64),
    Label(String),
}

impl DisparityValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Number(v) => number(*v),
            Self::Label(s) => Value::from(s.as_str()),
        }
    }
}

/// One metric across every value column, for one statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct DisparityRow {
    /// Name of the summary table the row was derived from.
    pub statistic: String,
    pub metric: DisparityMetric,
    /// Parallel to `DisparityTable::value_columns`.
    pub values: Vec<DisparityValue>,
}

/// Disparity rows stacked across all cached statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisparityTable {
    pub value_columns: Vec<String>,
    pub rows: Vec<DisparityRow>,
}

impl DisparityTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// The value of one (statistic, metric, column) cell.
    pub fn get(&self, statistic: &str, metric: DisparityMetric, column: &str) -> Option<&DisparityValue> {
        let idx = self.value_columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.statistic == statistic && r.metric == metric)
            .map(|r| &r.values[idx])
    }

    /// Rows derived from one statistic.
    pub fn for_statistic<'a>(&'a self, statistic: &'a str) -> impl Iterator<Item = &'a DisparityRow> + 'a {
        self.rows.iter().filter(move |r| r.statistic == statistic)
    }

    /// Rows as ordered JSON objects: `statistics`, `disparity_metric`, then
    /// one entry per value column. NaN becomes `null`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert("statistics".to_string(), Value::from(row.statistic.as_str()));
                record.insert("disparity_metric".to_string(), Value::from(row.metric.label()));
                for (column, value) in self.value_columns.iter().zip(&row.values) {
                    record.insert(column.clone(), value.to_json());
                }
                record
            })
            .collect()
    }
}
