//! Projection of a scored table onto what the engine analyzes.

use saged_core::errors::SchemaError;
use saged_core::types::collections::FxHashMap;
use saged_core::types::{Dimension, GroupType, NON_ESSENTIAL_COLUMNS};

use super::scored::ScoredTable;
use crate::schema::{ColumnKey, Schema};

/// Specification columns plus the numeric value and baseline columns.
///
/// Numeric columns are stored once per name, so a baseline that is also an
/// analyzed generation is not duplicated.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    dimensions: [Vec<Option<String>>; 3],
    value_keys: Vec<ColumnKey>,
    numeric: FxHashMap<String, Vec<f64>>,
    n_rows: usize,
}

impl NormalizedTable {
    /// Filter rows to `target_groups` on `group_type` (when non-empty), then
    /// project onto the specification columns, every analyzed
    /// `{generation}_{feature}` column, the `{baseline}_{feature}` columns
    /// that exist, and any other generation's column of an accepted feature.
    pub fn build(
        table: &ScoredTable,
        schema: &Schema,
        baseline: &str,
        group_type: GroupType,
        target_groups: Option<&[String]>,
    ) -> Result<Self, SchemaError> {
        let mut dim_columns = Vec::with_capacity(3);
        for dim in Dimension::ALL {
            let column = table
                .column(dim.as_str())
                .ok_or_else(|| SchemaError::MissingSpecificationColumn {
                    column: dim.as_str().to_string(),
                })?;
            dim_columns.push(column);
        }

        for dropped in NON_ESSENTIAL_COLUMNS {
            if table.has_column(dropped) {
                tracing::debug!(column = dropped, "dropping non-essential column");
            }
        }

        let keep: Vec<usize> = match target_groups {
            Some(groups) if !groups.is_empty() => {
                let column = dim_columns[group_type.dimension().index()];
                (0..table.n_rows())
                    .filter(|&row| {
                        column
                            .text_at(row)
                            .is_some_and(|v| groups.iter().any(|g| g.as_str() == v.as_ref()))
                    })
                    .collect()
            }
            _ => (0..table.n_rows()).collect(),
        };

        let dimensions: [Vec<Option<String>>; 3] = std::array::from_fn(|i| {
            keep.iter()
                .map(|&row| dim_columns[i].text_at(row).map(|v| v.into_owned()))
                .collect()
        });

        let value_keys = schema.value_keys();
        let mut numeric: FxHashMap<String, Vec<f64>> = FxHashMap::default();
        let baseline_keys = schema.features.iter().map(|f| ColumnKey::new(baseline, f.clone()));
        for key in value_keys.iter().cloned().chain(baseline_keys) {
            let name = key.column_name();
            if numeric.contains_key(&name) {
                continue;
            }
            match table.column(&name) {
                Some(column) => {
                    let all = column.to_numeric();
                    numeric.insert(name, keep.iter().map(|&row| all[row]).collect());
                }
                None if key.generation == baseline && !schema.generations.contains(&key.generation) => {
                    tracing::debug!(column = %name, "baseline column absent");
                }
                None => return Err(SchemaError::MissingValueColumn { column: name }),
            }
        }

        // Other generations of an accepted feature stay available as
        // per-statistic baselines.
        for name in table.column_names() {
            if numeric.contains_key(name) {
                continue;
            }
            let Some(key) = ColumnKey::parse(name) else {
                continue;
            };
            if !schema.features.contains(&key.feature) {
                continue;
            }
            if let Some(column) = table.column(name) {
                let all = column.to_numeric();
                numeric.insert(name.clone(), keep.iter().map(|&row| all[row]).collect());
            }
        }

        Ok(Self {
            dimensions,
            value_keys,
            numeric,
            n_rows: keep.len(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Values of a specification column, `None` where missing.
    pub fn dimension(&self, dim: Dimension) -> &[Option<String>] {
        &self.dimensions[dim.index()]
    }

    /// The analyzed value columns, feature-major.
    pub fn value_keys(&self) -> &[ColumnKey] {
        &self.value_keys
    }

    pub fn value_column_names(&self) -> Vec<String> {
        self.value_keys.iter().map(ColumnKey::column_name).collect()
    }

    /// A numeric column kept by the projection (value or candidate baseline).
    pub fn numeric(&self, key: &ColumnKey) -> Option<&[f64]> {
        self.numeric.get(&key.column_name()).map(Vec::as_slice)
    }
}
