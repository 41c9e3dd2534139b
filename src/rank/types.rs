use serde::{Deserialize, Serialize};

use crate::eligibility::Penalty;

/// Fusion weights for the three signal components.
///
/// The exact split is a tunable default, not a contract: weights are
/// renormalized per candidate over the components that are present, so any
/// non-degenerate split produces valid [0,1] scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub vector: f32,
    pub lexical: f32,
    pub semantic: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: 0.55,
            lexical: 0.20,
            semantic: 0.25,
        }
    }
}

impl FusionWeights {
    /// Returns `true` when all weights are non-negative and at least one is
    /// positive.
    pub fn is_valid(&self) -> bool {
        let weights = [self.vector, self.lexical, self.semantic];
        weights.iter().all(|w| *w >= 0.0 && w.is_finite()) && weights.iter().any(|w| *w > 0.0)
    }

    /// Stable textual fingerprint for cache keys.
    pub fn fingerprint(&self) -> String {
        format!(
            "v={:.4},l={:.4},s={:.4}",
            self.vector, self.lexical, self.semantic
        )
    }
}

/// Per-candidate component scores, each in [0,1] or absent.
///
/// `None` means "signal not computed" (missing embedding, judge failure) and
/// is excluded from fusion by weight renormalization. `Some(0.0)` is a valid
/// low signal and is fused normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub vector: Option<f32>,
    pub lexical: Option<f32>,
    pub semantic: Option<f32>,
}

/// Aggregator input: one shortlisted candidate with all signals collected.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub company_id: String,
    pub company_name: String,
    pub components: ComponentScores,
    pub penalty: Penalty,
    /// Judge justification bullets, empty when the semantic component is
    /// absent or carried no reasons.
    pub justification: Vec<String>,
}

/// One entry of the ranked result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub incentive_id: String,
    pub company_id: String,
    pub company_name: String,
    pub components: ComponentScores,
    pub penalty: Penalty,
    /// Fused score in [0,1].
    pub final_score: f32,
    /// 1-based position in the result set.
    pub rank: usize,
    /// Human-readable justification, strongest signal first.
    pub explanations: Vec<String>,
}
