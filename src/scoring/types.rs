//! @ai:module:intent Score types produced by the aggregator
//! @ai:module:layer domain
//! @ai:module:public_api ScoredResult, WeightingTier
//! @ai:module:stateless true

use serde::{Serialize, Serializer};

/// Wire value for a sub-score that could not be computed.
pub const UNAVAILABLE: &str = "unavailable";

/// @ai:intent Which weight tuple produced the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingTier {
    /// static 0.4, dynamic 0.3, verification 0.2, diversity 0.1
    Full,
    /// static 0.6, dynamic 0.3, diversity 0.1
    StaticDynamicDiversity,
    /// static 0.6, verification 0.3, diversity 0.1
    StaticVerificationDiversity,
    /// static 0.8, diversity 0.2
    StaticDiversity,
    /// final = static (quick mode)
    QuickPassThrough,
    /// baseline inputs missing; no final score
    Unavailable,
}

impl WeightingTier {
    /// @ai:intent Weights as (static, dynamic, verification, diversity)
    /// @ai:post weights sum to 1.0 for every scoring tier
    /// @ai:effects pure
    pub fn weights(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            WeightingTier::Full => Some((0.4, 0.3, 0.2, 0.1)),
            WeightingTier::StaticDynamicDiversity => Some((0.6, 0.3, 0.0, 0.1)),
            WeightingTier::StaticVerificationDiversity => Some((0.6, 0.0, 0.3, 0.1)),
            WeightingTier::StaticDiversity => Some((0.8, 0.0, 0.0, 0.2)),
            WeightingTier::QuickPassThrough => Some((1.0, 0.0, 0.0, 0.0)),
            WeightingTier::Unavailable => None,
        }
    }
}

/// @ai:intent Sub-scores and the combined final score for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    #[serde(serialize_with = "score_or_unavailable")]
    pub static_score: Option<f64>,
    #[serde(serialize_with = "score_or_unavailable")]
    pub dynamic_score: Option<f64>,
    #[serde(serialize_with = "score_or_unavailable")]
    pub verification_score: Option<f64>,
    #[serde(serialize_with = "score_or_unavailable")]
    pub diversity_score: Option<f64>,
    #[serde(serialize_with = "score_or_unavailable")]
    pub final_score: Option<f64>,
    pub weighting_tier: WeightingTier,
}

impl ScoredResult {
    /// @ai:intent Result with nothing available
    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self {
            static_score: None,
            dynamic_score: None,
            verification_score: None,
            diversity_score: None,
            final_score: None,
            weighting_tier: WeightingTier::Unavailable,
        }
    }
}

fn score_or_unavailable<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(score) if score.is_finite() => serializer.serialize_f64(*score),
        _ => serializer.serialize_str(UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_serializes_as_sentinel() {
        let scored = ScoredResult {
            static_score: Some(8.0),
            ..ScoredResult::unavailable()
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["static_score"], 8.0);
        assert_eq!(json["dynamic_score"], "unavailable");
        assert_eq!(json["final_score"], "unavailable");
        assert_eq!(json["weighting_tier"], "unavailable");
    }

    #[test]
    fn test_weights_sum_to_one() {
        for tier in [
            WeightingTier::Full,
            WeightingTier::StaticDynamicDiversity,
            WeightingTier::StaticVerificationDiversity,
            WeightingTier::StaticDiversity,
            WeightingTier::QuickPassThrough,
        ] {
            let (a, b, c, d) = tier.weights().unwrap();
            assert!((a + b + c + d - 1.0).abs() < 1e-9, "{tier:?}");
        }
        assert!(WeightingTier::Unavailable.weights().is_none());
    }
}
