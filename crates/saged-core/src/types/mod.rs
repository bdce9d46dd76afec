//! Shared types: dimensions, collection aliases, and engine constants.

pub mod collections;
pub mod dimension;

pub use dimension::{Dimension, GroupType};

/// Sentinel written into dimensions that were collapsed in a grouping.
pub const ALL_SENTINEL: &str = "ALL";

/// Default generation used as the comparison reference.
pub const DEFAULT_BASELINE: &str = "baseline";

/// Trailing token that marks a column as a numeric, diagnosable score.
pub const SCORE_MARKER: &str = "score";

/// Columns carried by scored tables that are never analyzed.
pub const NON_ESSENTIAL_COLUMNS: [&str; 2] = ["prompts", "keyword"];
