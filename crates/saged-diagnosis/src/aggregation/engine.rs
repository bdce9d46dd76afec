//! Grouping/aggregation engine.
//!
//! For every combination in the grouping lattice, rows are grouped by the
//! distinct values of that combination's dimensions and the statistic is
//! evaluated on each value column per group. Results from all combinations
//! are unioned into one summary table.

use std::collections::BTreeMap;

use saged_core::types::collections::DimensionVec;
use saged_core::types::{Dimension, ALL_SENTINEL};

use super::lattice::grouping_lattice;
use super::types::{GroupKey, SummaryRow, SummaryTable};
use crate::schema::ColumnKey;
use crate::statistics::{ColumnSample, Statistic, StatisticKind};
use crate::table::NormalizedTable;

/// The member rows of one summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    pub grouped: DimensionVec<Dimension>,
    /// Indices into the normalized table.
    pub rows: Vec<usize>,
}

/// Whole-table inputs of one value column, shared by every group.
#[derive(Debug, Clone, Copy)]
pub struct ColumnInput<'a> {
    pub key: &'a ColumnKey,
    pub values: &'a [f64],
    pub baseline: Option<&'a [f64]>,
    pub standard: f64,
}

impl<'a> ColumnInput<'a> {
    /// Evaluate `statistic` on the given rows of this column.
    pub fn evaluate(&self, statistic: &Statistic, rows: &[usize]) -> f64 {
        let values = gather(self.values, rows);
        let baseline = self.baseline.map(|b| gather(b, rows));
        statistic.evaluate(&ColumnSample {
            key: self.key,
            values: &values,
            baseline: baseline.as_deref(),
            standard: self.standard,
        })
    }
}

/// Copy the selected rows of a column.
pub fn gather(column: &[f64], rows: &[usize]) -> Vec<f64> {
    rows.iter().map(|&r| column[r]).collect()
}

/// One statistic's summary plus the groups and inputs it was computed from.
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    pub summary: SummaryTable,
    pub groups: Vec<Group>,
    pub inputs: Vec<ColumnInput<'a>>,
}

/// Evaluates statistics over a normalized table.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    table: &'a NormalizedTable,
    baseline: &'a str,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(table: &'a NormalizedTable, baseline: &'a str) -> Self {
        Self { table, baseline }
    }

    /// Partition rows for every lattice combination, coarsest first.
    ///
    /// The fully collapsed `ALL` group is always present, even over an
    /// empty table. Rows with a null value in a grouped dimension are left
    /// out of that combination's groups.
    pub fn partition(&self, specifications: &[Dimension]) -> Vec<Group> {
        let mut groups = Vec::new();
        for combo in grouping_lattice(specifications) {
            if combo.is_empty() {
                groups.push(Group {
                    key: GroupKey::all(),
                    grouped: combo,
                    rows: (0..self.table.n_rows()).collect(),
                });
                continue;
            }

            let columns: DimensionVec<&[Option<String>]> =
                combo.iter().map(|d| self.table.dimension(*d)).collect();
            let mut buckets: BTreeMap<Vec<&str>, Vec<usize>> = BTreeMap::new();
            for row in 0..self.table.n_rows() {
                let values: Option<Vec<&str>> =
                    columns.iter().map(|c| c[row].as_deref()).collect();
                if let Some(values) = values {
                    buckets.entry(values).or_default().push(row);
                }
            }

            tracing::debug!(combination = ?combo, groups = buckets.len(), "grouping combination");

            for (values, rows) in buckets {
                let key: [String; 3] = std::array::from_fn(|i| {
                    combo
                        .iter()
                        .position(|d| d.index() == i)
                        .map_or_else(|| ALL_SENTINEL.to_string(), |p| values[p].to_string())
                });
                groups.push(Group {
                    key: GroupKey::new(key),
                    grouped: combo.clone(),
                    rows,
                });
            }
        }
        groups
    }

    /// Per-column inputs: the whole-table values, the paired baseline
    /// column when the statistic needs one, and the standard computed once
    /// over the whole table.
    pub fn column_inputs(&self, statistic: &Statistic) -> Vec<ColumnInput<'a>> {
        let baseline = statistic.baseline(self.baseline);
        let table = self.table;
        table
            .value_keys()
            .iter()
            .filter_map(|key| {
                let values = table.numeric(key)?;
                let paired = baseline.and_then(|generation| {
                    let paired_key = key.with_generation(generation);
                    let column = table.numeric(&paired_key);
                    if column.is_none() {
                        warn_missing_baseline(statistic, key, &paired_key);
                    }
                    column
                });
                Some(ColumnInput {
                    key,
                    values,
                    baseline: paired,
                    standard: statistic.standard(values),
                })
            })
            .collect()
    }

    /// Evaluate `statistic` for every group and value column.
    pub fn summarize(
        &self,
        name: &str,
        statistic: &Statistic,
        specifications: &[Dimension],
    ) -> Aggregation<'a> {
        let inputs = self.column_inputs(statistic);
        let groups = self.partition(specifications);

        let rows = groups
            .iter()
            .map(|group| SummaryRow {
                key: group.key.clone(),
                grouped: group.grouped.clone(),
                values: inputs
                    .iter()
                    .map(|input| input.evaluate(statistic, &group.rows))
                    .collect(),
                p_values: None,
            })
            .collect();

        Aggregation {
            summary: SummaryTable {
                name: name.to_string(),
                specifications: specifications.to_vec(),
                value_columns: inputs.iter().map(|i| i.key.column_name()).collect(),
                rows,
            },
            groups,
            inputs,
        }
    }
}

fn warn_missing_baseline(statistic: &Statistic, key: &ColumnKey, paired: &ColumnKey) {
    let fallback = match statistic {
        Statistic::Builtin(StatisticKind::KlDivergence { .. } | StatisticKind::Precision { .. }) => {
            "zeros"
        }
        _ => "none",
    };
    tracing::warn!(
        column = %key,
        baseline_column = %paired,
        fallback,
        "baseline column absent"
    );
}
