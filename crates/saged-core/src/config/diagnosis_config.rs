//! Diagnoser construction configuration.

use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_BASELINE;

/// Which generations and features to analyze, and how to filter rows.
///
/// `None` for `features` or `generations` means "infer from column names".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Features to analyze. Default: inferred.
    pub features: Option<Vec<String>>,
    /// Generations to analyze. Default: inferred.
    pub generations: Option<Vec<String>>,
    /// Whitelist of groups on `group_type`. Default: keep all rows.
    pub target_groups: Option<Vec<String>>,
    /// Reference generation. Default: "baseline".
    pub baseline: Option<String>,
    /// "domain" | "concept". Default: "domain".
    pub group_type: Option<String>,
}

impl DiagnosisConfig {
    /// Returns the effective baseline generation, defaulting to "baseline".
    pub fn effective_baseline(&self) -> &str {
        self.baseline.as_deref().unwrap_or(DEFAULT_BASELINE)
    }

    /// Returns the effective group type, defaulting to "domain".
    pub fn effective_group_type(&self) -> &str {
        self.group_type.as_deref().unwrap_or("domain")
    }

    /// Builder-style setter for explicit features.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style setter for explicit generations.
    pub fn with_generations<I, S>(mut self, generations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generations = Some(generations.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style setter for the target-group whitelist.
    pub fn with_target_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style setter for the group type.
    pub fn with_group_type(mut self, group_type: impl Into<String>) -> Self {
        self.group_type = Some(group_type.into());
        self
    }
}
