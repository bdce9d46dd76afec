//! Disparity diagnosis engine.
//!
//! Turns a wide scored table (specification columns `concept`, `domain`,
//! `source_tag` plus `{generation}_{feature}` score columns) into per-group
//! summary statistics over every subset of the grouping dimensions, with
//! optional permutation significance testing, and derives cross-group
//! disparity diagnostics from each summary.

pub mod aggregation;
pub mod diagnoser;
pub mod disparity;
pub mod plan;
pub mod schema;
pub mod significance;
pub mod statistics;
pub mod table;

pub use aggregation::{GroupKey, SummaryRow, SummaryTable};
pub use diagnoser::DisparityDiagnoser;
pub use disparity::{DisparityMetric, DisparityTable, DisparityValue, DixonOutcome};
pub use plan::{run_plan, PlanFailure, PlanReport};
pub use schema::{ColumnKey, Schema};
pub use statistics::{ColumnSample, CustomStatistic, Statistic, StatisticKind, StatisticRegistry};
pub use table::{Cell, Column, ScoredTable};
