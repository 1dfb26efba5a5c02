//! @ai:module:intent Combine per-tool results into sub-scores and a weighted final score
//! @ai:module:layer application
//! @ai:module:public_api ScoreAggregator, ScoreAggregatorTrait, SubScores
//! @ai:module:stateless true

use super::diversity::diversity_score;
use super::rubric;
use super::types::{ScoredResult, WeightingTier};
use crate::model::{Mode, ToolKind, ToolPayload, ToolResult};

/// @ai:intent Trait for score aggregation
pub trait ScoreAggregatorTrait: Send + Sync {
    /// @ai:intent Score a request's tool results and extracted code under a mode
    fn score(&self, results: &[ToolResult], extracted_code: &str, mode: Mode) -> ScoredResult;
}

/// @ai:intent Sub-scores before weighting; None means unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubScores {
    pub static_score: Option<f64>,
    pub dynamic_score: Option<f64>,
    pub verification_score: Option<f64>,
    pub diversity_score: Option<f64>,
}

/// @ai:intent Applies the per-tool rubrics and the priority weighting table
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// @ai:intent Create a new score aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Sub-score of one successful tool result
    /// @ai:effects pure
    fn sub_score(result: &ToolResult) -> Option<f64> {
        match result.payload()? {
            ToolPayload::InterpretedStatic(outputs) => rubric::interpreted_static_score(outputs),
            ToolPayload::CompiledStatic(report) => Some(rubric::compiled_static_score(report)),
            ToolPayload::CrossLanguage(report) => rubric::cross_language_score(report),
            ToolPayload::DynamicMemory(report) => Some(rubric::dynamic_memory_score(report)),
            ToolPayload::FormalVerification(report) => Some(rubric::verification_score(report)),
        }
    }

    /// @ai:intent Mean sub-score across all results of the matching kinds
    /// @ai:effects pure
    fn mean_for(results: &[ToolResult], kinds: impl Fn(ToolKind) -> bool) -> Option<f64> {
        let scores: Vec<f64> = results
            .iter()
            .filter(|r| kinds(r.tool))
            .filter_map(Self::sub_score)
            .collect();

        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }

    /// @ai:intent Collect the four sub-scores
    /// @ai:post dynamic, verification and diversity stay None under quick mode
    /// @ai:effects pure
    pub fn sub_scores(&self, results: &[ToolResult], extracted_code: &str, mode: Mode) -> SubScores {
        let static_score = Self::mean_for(results, |k| k.is_static());

        if mode == Mode::Quick {
            return SubScores {
                static_score,
                ..Default::default()
            };
        }

        SubScores {
            static_score,
            dynamic_score: Self::mean_for(results, |k| k == ToolKind::DynamicMemory),
            verification_score: Self::mean_for(results, |k| k == ToolKind::FormalVerification),
            diversity_score: diversity_score(extracted_code),
        }
    }

    /// @ai:intent Richest tier whose inputs are all available
    /// @ai:effects pure
    pub fn select_tier(scores: &SubScores, mode: Mode) -> WeightingTier {
        let s = scores.static_score.is_some();

        if mode == Mode::Quick {
            return if s {
                WeightingTier::QuickPassThrough
            } else {
                WeightingTier::Unavailable
            };
        }

        let d = scores.dynamic_score.is_some();
        let v = scores.verification_score.is_some();
        let r = scores.diversity_score.is_some();

        match (s, d, v, r) {
            (true, true, true, true) => WeightingTier::Full,
            (true, true, _, true) => WeightingTier::StaticDynamicDiversity,
            (true, _, true, true) => WeightingTier::StaticVerificationDiversity,
            (true, _, _, true) => WeightingTier::StaticDiversity,
            _ => WeightingTier::Unavailable,
        }
    }

    /// @ai:intent Weighted final score for given sub-scores
    /// @ai:post result in [0, 10], or None for the unavailable tier
    /// @ai:effects pure
    pub fn combine(scores: SubScores, mode: Mode) -> ScoredResult {
        let tier = Self::select_tier(&scores, mode);

        let final_score = tier.weights().map(|(ws, wd, wv, wr)| {
            let weighted = ws * scores.static_score.unwrap_or(0.0)
                + wd * scores.dynamic_score.unwrap_or(0.0)
                + wv * scores.verification_score.unwrap_or(0.0)
                + wr * scores.diversity_score.unwrap_or(0.0);

            weighted.clamp(0.0, 10.0)
        });

        ScoredResult {
            static_score: scores.static_score,
            dynamic_score: scores.dynamic_score,
            verification_score: scores.verification_score,
            diversity_score: scores.diversity_score,
            final_score,
            weighting_tier: tier,
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreAggregatorTrait for ScoreAggregator {
    /// @ai:intent Score results under the priority weighting table
    /// @ai:effects pure
    fn score(&self, results: &[ToolResult], extracted_code: &str, mode: Mode) -> ScoredResult {
        let scores = self.sub_scores(results, extracted_code, mode);
        let scored = Self::combine(scores, mode);

        tracing::debug!(
            tier = ?scored.weighting_tier,
            final_score = ?scored.final_score,
            "Scored analysis results"
        );

        scored
    }
}
