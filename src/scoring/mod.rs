//! @ai:module:intent Rubrics, diversity metric and weighted aggregation
//! @ai:module:layer application
//! @ai:module:public_api ScoreAggregator, ScoreAggregatorTrait, ScoredResult, WeightingTier

pub mod aggregator;
pub mod diversity;
pub mod rubric;
pub mod types;

pub use aggregator::{ScoreAggregator, ScoreAggregatorTrait, SubScores};
pub use types::{ScoredResult, WeightingTier};
