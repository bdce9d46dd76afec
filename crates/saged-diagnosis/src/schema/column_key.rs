//! Typed address of a generation/feature score column.

use std::fmt;

use serde::{Deserialize, Serialize};

use saged_core::errors::SchemaError;
use saged_core::types::SCORE_MARKER;

/// A value column, addressed as `{generation}_{feature}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub generation: String,
    pub feature: String,
}

impl ColumnKey {
    pub fn new(generation: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            generation: generation.into(),
            feature: feature.into(),
        }
    }

    /// Column name in the scored table.
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.generation, self.feature)
    }

    /// The same feature under another generation (typically the baseline).
    pub fn with_generation(&self, generation: &str) -> Self {
        Self::new(generation, self.feature.clone())
    }

    /// Split a column name at its first underscore. Both halves must be non-empty.
    pub fn parse(name: &str) -> Option<Self> {
        let (generation, feature) = name.split_once('_')?;
        if generation.is_empty() || feature.is_empty() {
            return None;
        }
        Some(Self::new(generation, feature))
    }

    /// Parse only columns following the score naming convention: at least
    /// three underscore-separated parts, the last one being `score`.
    pub fn parse_score_column(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('_').collect();
        if parts.len() < 3 || parts.last() != Some(&SCORE_MARKER) {
            return None;
        }
        Self::parse(name)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.generation, self.feature)
    }
}

/// Reject generation identifiers that would make `{generation}_{feature}`
/// parse two ways.
pub fn validate_generation(identifier: &str) -> Result<(), SchemaError> {
    if identifier.is_empty() || identifier.contains('_') {
        return Err(SchemaError::AmbiguousIdentifier {
            identifier: identifier.to_string(),
            role: "generation".to_string(),
        });
    }
    Ok(())
}

/// Features may contain underscores but must be non-empty.
pub fn validate_feature(identifier: &str) -> Result<(), SchemaError> {
    if identifier.is_empty() || identifier.starts_with('_') {
        return Err(SchemaError::AmbiguousIdentifier {
            identifier: identifier.to_string(),
            role: "feature".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_first_underscore() {
        let key = ColumnKey::parse("modelA_toxicity_score").unwrap();
        assert_eq!(key.generation, "modelA");
        assert_eq!(key.feature, "toxicity_score");
        assert_eq!(key.column_name(), "modelA_toxicity_score");
    }

    #[test]
    fn test_score_marker_required() {
        assert!(ColumnKey::parse_score_column("modelA_toxicity").is_none());
        assert!(ColumnKey::parse_score_column("baseline_score").is_none());
        assert!(ColumnKey::parse_score_column("modelA_toxicity_score").is_some());
    }

    #[test]
    fn test_generation_with_underscore_is_ambiguous() {
        assert!(validate_generation("model_a").is_err());
        assert!(validate_generation("modelA").is_ok());
        assert!(validate_feature("toxicity_score").is_ok());
        assert!(validate_feature("").is_err());
    }
}
