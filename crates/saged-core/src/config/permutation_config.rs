//! Permutation significance test configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cost knobs for the permutation tester.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PermutationConfig {
    /// Shuffles per (group, column) pair. Default: 1000.
    pub num_permutations: Option<usize>,
    /// RNG seed; a random seed is drawn when unset.
    pub seed: Option<u64>,
    /// Value columns to test. Empty means every value column.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Wall-clock limit for the whole test, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Worker threads. Default: the global rayon pool.
    pub threads: Option<usize>,
}

impl PermutationConfig {
    /// Returns the effective permutation count, defaulting to 1000.
    pub fn effective_num_permutations(&self) -> usize {
        self.num_permutations.unwrap_or(1000)
    }

    /// Returns the timeout as a `Duration`, if set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Whether `column` is selected for testing.
    pub fn tests_column(&self, column: &str) -> bool {
        self.columns.is_empty() || self.columns.iter().any(|c| c == column)
    }
}
