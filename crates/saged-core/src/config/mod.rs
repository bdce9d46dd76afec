//! Configuration system for SAGED.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod analysis_config;
pub mod diagnosis_config;
pub mod permutation_config;
pub mod saged_config;

pub use analysis_config::{AnalysisConfig, StatisticOptions};
pub use diagnosis_config::DiagnosisConfig;
pub use permutation_config::PermutationConfig;
pub use saged_config::{ConfigOverrides, SagedConfig, PROJECT_CONFIG_FILE};
