//! Tabular inputs of the engine.
//!
//! `ScoredTable` is the raw scored benchmark handed in by the pipeline;
//! `NormalizedTable` is its projection onto the specification columns and
//! the generation/feature score columns that will actually be analyzed.

pub mod normalize;
pub mod scored;

pub use normalize::NormalizedTable;
pub use scored::{Cell, Column, ScoredTable};
