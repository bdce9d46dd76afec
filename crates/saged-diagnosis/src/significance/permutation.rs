//! Permutation significance tester.
//!
//! For each (group, value column) pair the group's values are shuffled
//! against their paired baseline rows `num_permutations` times and the
//! statistic is recomputed on every shuffle. The one-sided upper-tail
//! p-value is the fraction of permuted statistics at or above the observed
//! one. No multiple-comparison correction is applied.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use saged_core::config::PermutationConfig;
use saged_core::traits::{Cancellable, CancellationToken};

use crate::aggregation::engine::gather;
use crate::aggregation::{ColumnInput, Group};
use crate::statistics::{ColumnSample, Statistic};

/// Relative slack when comparing permuted and observed statistics, so that
/// permutations reproducing the observed value up to rounding count.
const TIE_TOLERANCE: f64 = 1e-12;

/// Runs permutation tests for one statistic application.
#[derive(Debug, Clone)]
pub struct PermutationTester<'a> {
    config: &'a PermutationConfig,
    token: CancellationToken,
    seed: u64,
}

impl<'a> PermutationTester<'a> {
    /// The tester observes `token` and, when configured, its own timeout
    /// starting now.
    pub fn new(config: &'a PermutationConfig, token: &CancellationToken) -> Self {
        let token = match config.timeout() {
            Some(timeout) => token.child_with_timeout(timeout),
            None => token.clone(),
        };
        Self {
            config,
            token,
            seed: config.seed.unwrap_or_else(rand::random),
        }
    }

    /// P-values for every group × column, parallel to the summary values.
    ///
    /// `observed[g][c]` is the statistic already computed for group `g` and
    /// column `c`. Columns outside the allow-list and pairs skipped by
    /// cancellation get NaN.
    pub fn run(
        &self,
        statistic: &Statistic,
        groups: &[Group],
        inputs: &[ColumnInput<'_>],
        observed: &[Vec<f64>],
    ) -> Vec<Vec<f64>> {
        let tested: Vec<bool> = inputs
            .iter()
            .map(|input| self.config.tests_column(&input.key.column_name()))
            .collect();
        let pairs: Vec<(usize, usize)> = (0..groups.len())
            .flat_map(|g| (0..inputs.len()).map(move |c| (g, c)))
            .filter(|&(_, c)| tested[c])
            .collect();

        tracing::debug!(
            pairs = pairs.len(),
            permutations = self.config.effective_num_permutations(),
            "permutation test"
        );

        let compute = || -> Vec<f64> {
            pairs
                .par_iter()
                .map(|&(g, c)| {
                    if self.token.is_cancelled() {
                        tracing::warn!(
                            group = %groups[g].key,
                            column = %inputs[c].key,
                            "permutation test skipped: cancelled"
                        );
                        return f64::NAN;
                    }
                    self.p_value(statistic, &groups[g], &inputs[c], observed[g][c], self.pair_seed(g, c))
                })
                .collect()
        };

        let results = match self.config.threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(compute),
                Err(e) => {
                    tracing::warn!(error = %e, "falling back to the global thread pool");
                    compute()
                }
            },
            None => compute(),
        };

        let mut p_values = vec![vec![f64::NAN; inputs.len()]; groups.len()];
        for (&(g, c), p) in pairs.iter().zip(results) {
            p_values[g][c] = p;
        }
        p_values
    }

    /// Empirical upper-tail p-value for one pair. NaN when the observed
    /// statistic is NaN or no permutations are requested.
    pub fn p_value(
        &self,
        statistic: &Statistic,
        group: &Group,
        input: &ColumnInput<'_>,
        observed: f64,
        seed: u64,
    ) -> f64 {
        let n = self.config.effective_num_permutations();
        if observed.is_nan() || n == 0 {
            return f64::NAN;
        }

        let mut shuffled = gather(input.values, &group.rows);
        let baseline = input.baseline.map(|b| gather(b, &group.rows));
        let threshold = observed - TIE_TOLERANCE * observed.abs().max(1.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let mut at_or_above = 0usize;
        for _ in 0..n {
            shuffled.shuffle(&mut rng);
            let stat = statistic.evaluate(&ColumnSample {
                key: input.key,
                values: &shuffled,
                baseline: baseline.as_deref(),
                standard: input.standard,
            });
            if stat >= threshold {
                at_or_above += 1;
            }
        }
        at_or_above as f64 / n as f64
    }

    /// Per-pair seed, independent of scheduling order.
    fn pair_seed(&self, group: usize, column: usize) -> u64 {
        splitmix(self.seed ^ splitmix(((group as u64) << 32) | column as u64))
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
