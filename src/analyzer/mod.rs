//! Analyzer module - answer scoring and aggregation

pub mod engine;
pub mod scoring;

pub use engine::{Aggregates, Aggregator};
pub use scoring::ItemScorer;
