//! Tests for layered configuration resolution.

use std::sync::Mutex;

use saged_core::config::{ConfigOverrides, SagedConfig, PROJECT_CONFIG_FILE};
use saged_core::errors::{ConfigError, SagedErrorCode};

/// Serializes tests that touch `SAGED_*` environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_saged_env_vars() {
    for key in [
        "SAGED_BASELINE",
        "SAGED_GROUP_TYPE",
        "SAGED_SPECIFICATIONS",
        "SAGED_ANALYZERS",
        "SAGED_NUM_PERMUTATIONS",
        "SAGED_PERMUTATION_SEED",
        "SAGED_PERMUTATION_TIMEOUT_MS",
        "SAGED_PERMUTATION_THREADS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_saged_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join(PROJECT_CONFIG_FILE),
        r#"
[diagnosis]
baseline = "reference"
group_type = "concept"

[analysis]
specifications = ["concept", "domain"]
analyzers = ["mean", "sr"]

[analysis.analyzer_configs.sr]
standard_by = "median"
selection_method = "within-range-0.1"

[permutation]
num_permutations = 500
"#,
    )
    .unwrap();

    std::env::set_var("SAGED_NUM_PERMUTATIONS", "250");
    std::env::set_var("SAGED_ANALYZERS", "mean, median ,");

    let overrides = ConfigOverrides {
        baseline: Some("modelA".to_string()),
        ..Default::default()
    };
    let config = SagedConfig::load(dir.path(), Some(&overrides)).unwrap();

    // override beats project file
    assert_eq!(config.diagnosis.effective_baseline(), "modelA");
    // env beats project file
    assert_eq!(config.permutation.effective_num_permutations(), 250);
    assert_eq!(config.analysis.analyzers, vec!["mean", "median"]);
    // project file beats defaults
    assert_eq!(config.diagnosis.effective_group_type(), "concept");
    assert_eq!(config.analysis.effective_specifications(), vec!["concept", "domain"]);
    let sr = config.analysis.options_for("sr");
    assert_eq!(sr.standard_by.as_deref(), Some("median"));

    clear_saged_env_vars();
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_saged_env_vars();

    let dir = tempdir();
    let config = SagedConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.diagnosis.effective_baseline(), "baseline");
    assert_eq!(config.diagnosis.effective_group_type(), "domain");
    assert_eq!(config.analysis.effective_specifications(), vec!["concept"]);
    assert_eq!(config.permutation.effective_num_permutations(), 1000);
    assert!(config.analysis.options_for("mean").test.is_none());
}

#[test]
fn test_invalid_group_type_from_env_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_saged_env_vars();

    std::env::set_var("SAGED_GROUP_TYPE", "source_tag");
    let dir = tempdir();
    let err = SagedConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "diagnosis.group_type"));
    assert_eq!(err.error_code(), "CONFIG_ERROR");

    clear_saged_env_vars();
}

#[test]
fn test_malformed_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_saged_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[permutation\nseed = 1").unwrap();
    let err = SagedConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_bad_values() {
    let zero_perms = SagedConfig::from_toml("[permutation]\nnum_permutations = 0").unwrap();
    assert!(SagedConfig::validate(&zero_perms).is_err());

    let bad_dimension = SagedConfig::from_toml("[analysis]\nspecifications = [\"keyword\"]").unwrap();
    assert!(SagedConfig::validate(&bad_dimension).is_err());

    let empty_specifications = SagedConfig::from_toml("[analysis]\nspecifications = []").unwrap();
    let err = SagedConfig::validate(&empty_specifications).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "analysis.specifications"));

    let omitted = SagedConfig::from_toml("[analysis]\nanalyzers = [\"mean\"]").unwrap();
    assert!(SagedConfig::validate(&omitted).is_ok());
    assert_eq!(omitted.analysis.effective_specifications(), vec!["concept"]);

    let zero_bins =
        SagedConfig::from_toml("[analysis.analyzer_configs.kl_divergence]\nbins = 0").unwrap();
    assert!(SagedConfig::validate(&zero_bins).is_err());

    let negative_width =
        SagedConfig::from_toml("[analysis.analyzer_configs.mode]\nbin_width = -0.5").unwrap();
    assert!(SagedConfig::validate(&negative_width).is_err());
}

#[test]
fn test_toml_round_trip() {
    let config = SagedConfig::from_toml(
        r#"
[diagnosis]
features = ["toxicity_score"]
generations = ["baseline", "modelA"]

[permutation]
seed = 7
columns = ["modelA_toxicity_score"]
timeout_ms = 5000
"#,
    )
    .unwrap();
    let restored = SagedConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(config, restored);
    assert_eq!(
        restored.permutation.timeout(),
        Some(std::time::Duration::from_millis(5000))
    );
}
