//! Prize criteria and the ranking engine.

pub mod engine;
pub mod types;

#[cfg(test)]
mod props;

pub use engine::RankingEngine;
pub use types::{CriteriaType, PrizeCriteria, RankingEntry, UserAggregate};
