//! The statistic library.
//!
//! Every statistic maps a numeric sample (NaN = missing) to one scalar.
//! Missing values are excluded before computing; a sample with no
//! non-missing values yields NaN. Paired statistics (KL divergence,
//! precision, correlation) also receive the same rows of the baseline
//! generation's column for the same feature.

pub mod descriptive;
pub mod distribution;
pub mod kind;
pub mod pairwise;
pub mod reduce;
pub mod registry;
pub mod selection;

pub use kind::{ColumnSample, CustomFn, CustomStatistic, Statistic, StatisticKind};
pub use pairwise::CorrelationMethod;
pub use registry::StatisticRegistry;
pub use selection::{SelectionMethod, StandardBy};
