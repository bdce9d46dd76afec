//! Nonparametric significance testing of summary statistics.

pub mod permutation;

pub use permutation::PermutationTester;
