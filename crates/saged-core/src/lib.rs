//! Core types, errors, configuration, tracing, and cancellation shared by the
//! SAGED disparity diagnosis engine.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
