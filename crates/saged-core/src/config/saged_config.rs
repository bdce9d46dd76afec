//! Top-level SAGED configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, DiagnosisConfig, PermutationConfig};
use crate::errors::ConfigError;
use crate::types::Dimension;

/// File name of the project-level config.
pub const PROJECT_CONFIG_FILE: &str = "saged.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SAGED_*`)
/// 3. Project config (`saged.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SagedConfig {
    pub diagnosis: DiagnosisConfig,
    pub analysis: AnalysisConfig,
    pub permutation: PermutationConfig,
}

/// Caller-supplied overrides, the highest-priority layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub baseline: Option<String>,
    pub group_type: Option<String>,
    pub specifications: Option<Vec<String>>,
    pub analyzers: Option<Vec<String>>,
    pub num_permutations: Option<usize>,
    pub seed: Option<u64>,
}

impl SagedConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SagedConfig) -> Result<(), ConfigError> {
        if let Some(ref group_type) = config.diagnosis.group_type {
            if group_type != "domain" && group_type != "concept" {
                return Err(ConfigError::ValidationFailed {
                    field: "diagnosis.group_type".to_string(),
                    message: format!("'{group_type}' must be 'domain' or 'concept'"),
                });
            }
        }
        if let Some(ref specifications) = config.analysis.specifications {
            if specifications.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.specifications".to_string(),
                    message: "must name at least one dimension".to_string(),
                });
            }
            for spec in specifications {
                if spec.parse::<Dimension>().is_err() {
                    return Err(ConfigError::ValidationFailed {
                        field: "analysis.specifications".to_string(),
                        message: format!("unknown dimension '{spec}'"),
                    });
                }
            }
        }
        if config.permutation.num_permutations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "permutation.num_permutations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.permutation.threads == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "permutation.threads".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (name, options) in &config.analysis.analyzer_configs {
            if options.bins == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("analysis.analyzer_configs.{name}.bins"),
                    message: "must be greater than 0".to_string(),
                });
            }
            if let Some(width) = options.bin_width {
                if width.is_nan() || width <= 0.0 {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("analysis.analyzer_configs.{name}.bin_width"),
                        message: "must be greater than 0".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut SagedConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SagedConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut SagedConfig, other: &SagedConfig) {
        // Diagnosis
        if other.diagnosis.features.is_some() {
            base.diagnosis.features = other.diagnosis.features.clone();
        }
        if other.diagnosis.generations.is_some() {
            base.diagnosis.generations = other.diagnosis.generations.clone();
        }
        if other.diagnosis.target_groups.is_some() {
            base.diagnosis.target_groups = other.diagnosis.target_groups.clone();
        }
        if other.diagnosis.baseline.is_some() {
            base.diagnosis.baseline = other.diagnosis.baseline.clone();
        }
        if other.diagnosis.group_type.is_some() {
            base.diagnosis.group_type = other.diagnosis.group_type.clone();
        }

        // Analysis
        if other.analysis.specifications.is_some() {
            base.analysis.specifications = other.analysis.specifications.clone();
        }
        if !other.analysis.analyzers.is_empty() {
            base.analysis.analyzers = other.analysis.analyzers.clone();
        }
        for (name, options) in &other.analysis.analyzer_configs {
            base.analysis
                .analyzer_configs
                .insert(name.clone(), options.clone());
        }

        // Permutation
        if other.permutation.num_permutations.is_some() {
            base.permutation.num_permutations = other.permutation.num_permutations;
        }
        if other.permutation.seed.is_some() {
            base.permutation.seed = other.permutation.seed;
        }
        if !other.permutation.columns.is_empty() {
            base.permutation.columns = other.permutation.columns.clone();
        }
        if other.permutation.timeout_ms.is_some() {
            base.permutation.timeout_ms = other.permutation.timeout_ms;
        }
        if other.permutation.threads.is_some() {
            base.permutation.threads = other.permutation.threads;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `SAGED_BASELINE`, `SAGED_NUM_PERMUTATIONS`, etc.
    fn apply_env_overrides(config: &mut SagedConfig) {
        if let Ok(val) = std::env::var("SAGED_BASELINE") {
            config.diagnosis.baseline = Some(val);
        }
        if let Ok(val) = std::env::var("SAGED_GROUP_TYPE") {
            config.diagnosis.group_type = Some(val);
        }
        if let Ok(val) = std::env::var("SAGED_SPECIFICATIONS") {
            config.analysis.specifications = Some(split_list(&val));
        }
        if let Ok(val) = std::env::var("SAGED_ANALYZERS") {
            config.analysis.analyzers = split_list(&val);
        }
        if let Ok(val) = std::env::var("SAGED_NUM_PERMUTATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.permutation.num_permutations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SAGED_PERMUTATION_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.permutation.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SAGED_PERMUTATION_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.permutation.timeout_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SAGED_PERMUTATION_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.permutation.threads = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut SagedConfig, o: &ConfigOverrides) {
        if let Some(ref v) = o.baseline {
            config.diagnosis.baseline = Some(v.clone());
        }
        if let Some(ref v) = o.group_type {
            config.diagnosis.group_type = Some(v.clone());
        }
        if let Some(ref v) = o.specifications {
            config.analysis.specifications = Some(v.clone());
        }
        if let Some(ref v) = o.analyzers {
            config.analysis.analyzers = v.clone();
        }
        if let Some(v) = o.num_permutations {
            config.permutation.num_permutations = Some(v);
        }
        if let Some(v) = o.seed {
            config.permutation.seed = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Comma-separated list, whitespace trimmed, empty items dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
