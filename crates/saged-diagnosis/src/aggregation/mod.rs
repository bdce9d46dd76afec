//! Grouping lattice, aggregation engine, and summary tables.

pub mod engine;
pub mod lattice;
pub mod types;

pub use engine::{Aggregation, AggregationEngine, ColumnInput, Group};
pub use lattice::grouping_lattice;
pub use types::{GroupKey, SummaryRow, SummaryTable, P_VALUE_SUFFIX};
