//! Disparity computer: spread and outlier diagnostics across the groups of
//! each summary table.

pub mod dixon;
pub mod metrics;
pub mod types;

pub use dixon::{dixon_q_test, DixonOutcome, DixonVariant};
pub use metrics::{compute_disparity, summary_disparity};
pub use types::{DisparityMetric, DisparityRow, DisparityTable, DisparityValue};
