//! Re-exports of performance-oriented collection types.

pub use rustc_hash::FxHashMap;
pub use smallvec::SmallVec;

/// SmallVec sized for a set of grouping dimensions (at most 3).
pub type DimensionVec<T> = SmallVec<[T; 3]>;
