//! The diagnoser facade: construction-time schema checks, cached summary
//! tables keyed by statistic name, and the stacked disparity table.

use saged_core::config::{DiagnosisConfig, PermutationConfig, StatisticOptions};
use saged_core::errors::{DiagnosisError, SagedErrorCode};
use saged_core::traits::{Cancellable, CancellationToken};
use saged_core::types::{Dimension, GroupType};

use crate::aggregation::{AggregationEngine, SummaryTable};
use crate::disparity::{compute_disparity, DisparityTable};
use crate::schema::{infer_schema, Schema};
use crate::significance::PermutationTester;
use crate::statistics::{ColumnSample, CustomStatistic, Statistic, StatisticRegistry};
use crate::table::{NormalizedTable, ScoredTable};

/// Default name of a custom statistic applied without one.
pub const DEFAULT_CUSTOM_NAME: &str = "customized";

/// Computes summary statistics and disparity diagnostics over one scored
/// table.
///
/// Schema problems fail at construction. Each applied statistic caches its
/// summary table under its generated name; re-applying a name replaces the
/// cached table in place.
#[derive(Debug)]
pub struct DisparityDiagnoser {
    baseline: String,
    schema: Schema,
    table: NormalizedTable,
    specifications: Vec<Dimension>,
    registry: StatisticRegistry,
    summaries: Vec<SummaryTable>,
    disparity: Option<DisparityTable>,
    token: CancellationToken,
}

impl DisparityDiagnoser {
    /// Validate the table against the configuration and project it onto the
    /// columns that will be analyzed.
    pub fn new(table: &ScoredTable, config: &DiagnosisConfig) -> Result<Self, DiagnosisError> {
        let group_type: GroupType = config.effective_group_type().parse()?;
        let baseline = config.effective_baseline().to_string();

        let schema = infer_schema(
            table,
            config.features.as_deref(),
            config.generations.as_deref(),
        )
        .inspect_err(|e| {
            tracing::error!(code = e.error_code(), error = %e, "schema validation failed");
        })?;

        let normalized = NormalizedTable::build(
            table,
            &schema,
            &baseline,
            group_type,
            config.target_groups.as_deref(),
        )?;

        tracing::info!(
            rows = normalized.n_rows(),
            generations = ?schema.generations,
            features = ?schema.features,
            "diagnoser ready"
        );

        Ok(Self {
            baseline,
            schema,
            table: normalized,
            specifications: vec![Dimension::Concept],
            registry: StatisticRegistry::new(),
            summaries: Vec::new(),
            disparity: None,
            token: CancellationToken::new(),
        })
    }

    /// Change the grouping dimensions used by subsequent applications.
    pub fn set_specifications<S: AsRef<str>>(
        &mut self,
        specifications: &[S],
    ) -> Result<&mut Self, DiagnosisError> {
        if specifications.is_empty() {
            return Err(DiagnosisError::InvalidSpecification {
                message: "at least one dimension is required".to_string(),
            });
        }
        self.specifications = specifications
            .iter()
            .map(|s| s.as_ref().parse::<Dimension>())
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub fn specifications(&self) -> &[Dimension] {
        &self.specifications
    }

    /// Observe `token` for cancellation of permutation runs.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn registry(&self) -> &StatisticRegistry {
        &self.registry
    }

    /// Register custom statistics so analysis plans can name them.
    pub fn registry_mut(&mut self) -> &mut StatisticRegistry {
        &mut self.registry
    }

    /// Resolve `name` and apply it. When `options.test` is set, the default
    /// permutation configuration is used.
    pub fn apply_statistic(
        &mut self,
        name: &str,
        options: &StatisticOptions,
    ) -> Result<&mut Self, DiagnosisError> {
        let statistic = self.registry.resolve(name, options)?;
        if options.effective_test() {
            self.apply(&statistic, Some(&PermutationConfig::default()))
        } else {
            self.apply(&statistic, None)
        }
    }

    /// Resolve `name` and apply it with a permutation test.
    pub fn apply_statistic_with(
        &mut self,
        name: &str,
        options: &StatisticOptions,
        permutation: &PermutationConfig,
    ) -> Result<&mut Self, DiagnosisError> {
        let statistic = self.registry.resolve(name, options)?;
        self.apply(&statistic, Some(permutation))
    }

    /// Apply a user function under `name` (default `customized`).
    pub fn customized_statistics<F>(
        &mut self,
        name: Option<&str>,
        paired: bool,
        func: F,
        permutation: Option<&PermutationConfig>,
    ) -> Result<&mut Self, DiagnosisError>
    where
        F: Fn(&ColumnSample<'_>) -> f64 + Send + Sync + 'static,
    {
        let custom = CustomStatistic::new(name.unwrap_or(DEFAULT_CUSTOM_NAME), paired, func);
        self.apply(&Statistic::Custom(custom), permutation)
    }

    /// Compute `statistic` over the grouping lattice and cache the summary.
    pub fn apply(
        &mut self,
        statistic: &Statistic,
        permutation: Option<&PermutationConfig>,
    ) -> Result<&mut Self, DiagnosisError> {
        if self.token.is_cancelled() {
            return Err(DiagnosisError::Cancelled);
        }
        let name = statistic.name(&self.baseline);
        let engine = AggregationEngine::new(&self.table, &self.baseline);
        let mut aggregation = engine.summarize(&name, statistic, &self.specifications);

        if let Some(config) = permutation {
            let observed: Vec<Vec<f64>> = aggregation
                .summary
                .rows
                .iter()
                .map(|r| r.values.clone())
                .collect();
            let p_values = PermutationTester::new(config, &self.token).run(
                statistic,
                &aggregation.groups,
                &aggregation.inputs,
                &observed,
            );
            for (row, p) in aggregation.summary.rows.iter_mut().zip(p_values) {
                row.p_values = Some(p);
            }
        }

        tracing::info!(
            statistic = %name,
            rows = aggregation.summary.n_rows(),
            tested = permutation.is_some(),
            "statistic applied"
        );

        let summary = aggregation.summary;
        match self.summaries.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = summary,
            None => self.summaries.push(summary),
        }
        self.disparity = None;
        Ok(self)
    }

    /// The cached summary for a generated statistic name.
    pub fn get_summary(&self, name: &str) -> Option<&SummaryTable> {
        self.summaries.iter().find(|s| s.name == name)
    }

    /// Every cached summary, in first-application order.
    pub fn summaries(&self) -> &[SummaryTable] {
        &self.summaries
    }

    pub fn summary_names(&self) -> Vec<&str> {
        self.summaries.iter().map(|s| s.name.as_str()).collect()
    }

    /// Build (or return the already built) disparity table over every
    /// cached summary. Empty when nothing has been applied.
    pub fn compute_disparity(&mut self) -> &DisparityTable {
        let value_columns = self.value_columns();
        let summaries = &self.summaries;
        self.disparity.get_or_insert_with(|| {
            let table = compute_disparity(summaries, &value_columns);
            tracing::info!(
                statistics = summaries.len(),
                rows = table.n_rows(),
                "disparity computed"
            );
            table
        })
    }

    /// The last computed disparity table, if still current.
    pub fn disparity(&self) -> Option<&DisparityTable> {
        self.disparity.as_ref()
    }

    /// Names of the analyzed value columns, feature-major.
    pub fn value_columns(&self) -> Vec<String> {
        self.table.value_column_names()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn n_rows(&self) -> usize {
        self.table.n_rows()
    }
}
