//! Batch application of an analysis plan.

use saged_core::config::{AnalysisConfig, PermutationConfig};
use saged_core::errors::{DiagnosisError, SagedErrorCode};

use crate::diagnoser::DisparityDiagnoser;

/// A plan entry that failed; the rest of the plan still ran.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanFailure {
    pub analyzer: String,
    pub error: DiagnosisError,
}

/// Outcome of `run_plan`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanReport {
    /// Generated summary names actually cached, in plan order.
    pub applied: Vec<String>,
    pub errors: Vec<PlanFailure>,
}

impl PlanReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply the plan's specifications, then each analyzer in order with its
/// options, then compute the disparity table.
///
/// Invalid specifications fail the whole plan. Unknown analyzers and
/// failing statistics are logged and collected while the rest proceed.
/// Analyzers whose options request testing run with `permutation`.
pub fn run_plan(
    diagnoser: &mut DisparityDiagnoser,
    analysis: &AnalysisConfig,
    permutation: &PermutationConfig,
) -> Result<PlanReport, DiagnosisError> {
    diagnoser.set_specifications(&analysis.effective_specifications())?;

    let mut report = PlanReport::default();
    for analyzer in &analysis.analyzers {
        let options = analysis.options_for(analyzer);
        let permutation = options.effective_test().then_some(permutation);
        let result = diagnoser.registry().resolve(analyzer, &options).and_then(|statistic| {
            let name = statistic.name(diagnoser.baseline());
            diagnoser.apply(&statistic, permutation).map(|_| name)
        });
        match result {
            Ok(name) => {
                if !report.applied.contains(&name) {
                    report.applied.push(name);
                }
            }
            Err(error) => {
                tracing::warn!(
                    analyzer = %analyzer,
                    code = error.error_code(),
                    error = %error,
                    "analyzer skipped"
                );
                report.errors.push(PlanFailure {
                    analyzer: analyzer.clone(),
                    error,
                });
            }
        }
    }

    let rows = diagnoser.compute_disparity().n_rows();
    tracing::info!(
        applied = report.applied.len(),
        failed = report.errors.len(),
        disparity_rows = rows,
        "analysis plan finished"
    );
    Ok(report)
}
