//! Generation/feature inference and validation.

use std::collections::BTreeSet;

use saged_core::errors::SchemaError;

use super::column_key::{validate_feature, validate_generation, ColumnKey};
use crate::table::ScoredTable;

/// The authoritative generations and features to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub generations: Vec<String>,
    pub features: Vec<String>,
}

impl Schema {
    /// Value columns in feature-major order.
    pub fn value_keys(&self) -> Vec<ColumnKey> {
        self.features
            .iter()
            .flat_map(|f| self.generations.iter().map(move |g| ColumnKey::new(g.clone(), f.clone())))
            .collect()
    }
}

/// Resolve the generations and features to analyze.
///
/// Explicit lists are used verbatim. Omitted lists are inferred from score
/// columns; an inferred generation is kept only if it carries every feature.
/// Fails if the resulting generation × feature matrix is empty or has a
/// missing column.
pub fn infer_schema(
    table: &ScoredTable,
    features: Option<&[String]>,
    generations: Option<&[String]>,
) -> Result<Schema, SchemaError> {
    let score_keys: Vec<ColumnKey> = table
        .column_names()
        .iter()
        .filter_map(|name| ColumnKey::parse_score_column(name))
        .collect();

    let features: Vec<String> = match features {
        Some(explicit) => explicit.to_vec(),
        None => score_keys
            .iter()
            .map(|k| k.feature.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let generations: Vec<String> = match generations {
        Some(explicit) => explicit.to_vec(),
        None => score_keys
            .iter()
            .map(|k| k.generation.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|g| {
                features
                    .iter()
                    .all(|f| table.has_column(&ColumnKey::new(g.clone(), f.clone()).column_name()))
            })
            .collect(),
    };

    for g in &generations {
        validate_generation(g)?;
    }
    for f in &features {
        validate_feature(f)?;
    }

    let schema = Schema {
        generations,
        features,
    };
    validate_schema(table, &schema)?;
    Ok(schema)
}

/// Every generation × feature column must exist.
pub fn validate_schema(table: &ScoredTable, schema: &Schema) -> Result<(), SchemaError> {
    if schema.generations.is_empty() || schema.features.is_empty() {
        return Err(SchemaError::NoValueColumns);
    }
    for key in schema.value_keys() {
        let column = key.column_name();
        if !table.has_column(&column) {
            return Err(SchemaError::MissingValueColumn { column });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table(columns: &[&str]) -> ScoredTable {
        let row: Vec<(String, Cell)> = columns
            .iter()
            .map(|c| (c.to_string(), Cell::from(0.5)))
            .collect();
        ScoredTable::from_rows(vec![row]).unwrap()
    }

    #[test]
    fn test_infers_features_and_complete_generations() {
        let t = table(&[
            "concept",
            "baseline_toxicity_score",
            "baseline_regard_score",
            "modelA_toxicity_score",
            "modelA_regard_score",
            "modelB_toxicity_score",
        ]);
        // modelB lacks regard_score
        let schema = infer_schema(&t, None, None).unwrap();
        assert_eq!(schema.features, vec!["regard_score", "toxicity_score"]);
        assert_eq!(schema.generations, vec!["baseline", "modelA"]);
    }

    #[test]
    fn test_explicit_lists_used_verbatim() {
        let t = table(&["baseline_toxicity", "modelA_toxicity"]);
        let schema = infer_schema(
            &t,
            Some(&["toxicity".to_string()]),
            Some(&["modelA".to_string()]),
        )
        .unwrap();
        assert_eq!(schema.generations, vec!["modelA"]);
        assert_eq!(schema.value_keys()[0].column_name(), "modelA_toxicity");
    }

    #[test]
    fn test_missing_declared_column_fails() {
        let t = table(&["modelA_toxicity_score"]);
        let err = infer_schema(&t, None, Some(&["modelB".to_string()])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingValueColumn {
                column: "modelB_toxicity_score".to_string()
            }
        );
    }

    #[test]
    fn test_no_score_columns_fails() {
        let t = table(&["concept", "domain"]);
        assert_eq!(infer_schema(&t, None, None).unwrap_err(), SchemaError::NoValueColumns);
    }

    #[test]
    fn test_declared_generation_with_underscore_rejected() {
        let t = table(&["model_a_toxicity_score"]);
        let err = infer_schema(
            &t,
            Some(&["a_toxicity_score".to_string()]),
            Some(&["model".to_string(), "model_x".to_string()]),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousIdentifier { .. }));
    }
}
