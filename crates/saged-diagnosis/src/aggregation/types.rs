//! Summary tables: one statistic's per-group results.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use saged_core::types::collections::DimensionVec;
use saged_core::types::{Dimension, ALL_SENTINEL};

/// Suffix of the per-column significance column names.
pub const P_VALUE_SUFFIX: &str = "_p_value";

/// Values of `concept`, `domain`, `source_tag` for one summary row;
/// ungrouped dimensions hold the `ALL` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey([String; 3]);

impl GroupKey {
    /// The fully collapsed key.
    pub fn all() -> Self {
        Self(std::array::from_fn(|_| ALL_SENTINEL.to_string()))
    }

    pub fn new(values: [String; 3]) -> Self {
        Self(values)
    }

    pub fn get(&self, dim: Dimension) -> &str {
        &self.0[dim.index()]
    }

    pub fn values(&self) -> &[String; 3] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0[0], self.0[1], self.0[2])
    }
}

/// One group's statistic values, parallel to `SummaryTable::value_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: GroupKey,
    /// Dimensions this row was grouped by; empty for the `ALL` row.
    pub grouped: DimensionVec<Dimension>,
    pub values: Vec<f64>,
    /// Permutation p-values, present when significance testing ran.
    pub p_values: Option<Vec<f64>>,
}

/// The cached result of one statistic application.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub name: String,
    pub specifications: Vec<Dimension>,
    pub value_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.value_columns.iter().position(|c| c == column)
    }

    /// One value column across all rows, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// The p-values of one column, when significance testing ran.
    pub fn p_value_column(&self, column: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .map(|r| r.p_values.as_ref().map(|p| p[idx]))
            .collect()
    }

    pub fn has_p_values(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.p_values.is_some())
    }

    /// `{column}_p_value` names, empty when no test ran.
    pub fn p_value_columns(&self) -> Vec<String> {
        if !self.has_p_values() {
            return Vec::new();
        }
        self.value_columns
            .iter()
            .map(|c| format!("{c}{P_VALUE_SUFFIX}"))
            .collect()
    }

    /// The row for a given group key.
    pub fn row(&self, key: &GroupKey) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| &r.key == key)
    }

    /// Column order of `to_records`: specification dimensions first, then
    /// the remaining dimensions, value columns, and p-value columns.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.dimension_order().iter().map(|d| d.as_str().to_string()).collect();
        columns.extend(self.value_columns.iter().cloned());
        columns.extend(self.p_value_columns());
        columns
    }

    fn dimension_order(&self) -> DimensionVec<Dimension> {
        let mut order: DimensionVec<Dimension> = DimensionVec::new();
        for dim in self.specifications.iter().chain(Dimension::ALL.iter()) {
            if !order.contains(dim) {
                order.push(*dim);
            }
        }
        order
    }

    /// Rows as ordered JSON objects, for the reporting layer. NaN becomes
    /// `null`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let dims = self.dimension_order();
        let p_columns = self.p_value_columns();
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for dim in &dims {
                    record.insert(dim.as_str().to_string(), Value::from(row.key.get(*dim)));
                }
                for (column, value) in self.value_columns.iter().zip(&row.values) {
                    record.insert(column.clone(), number(*value));
                }
                if let Some(p_values) = &row.p_values {
                    for (column, p) in p_columns.iter().zip(p_values) {
                        record.insert(column.clone(), number(*p));
                    }
                }
                record
            })
            .collect()
    }
}

pub(crate) fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
