//! Schema inference: which (generation, feature) pairs a scored table carries.
//!
//! A score column is named `{generation}_{feature}`, where the feature itself
//! ends in the `score` marker (e.g. `modelA_toxicity_score`). The split is at
//! the first underscore, so generation identifiers never contain one.

pub mod column_key;
pub mod inference;

pub use column_key::ColumnKey;
pub use inference::{infer_schema, Schema};
