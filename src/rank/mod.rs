//! Score fusion, ranking, and explanation assembly.
//!
//! `base = Σ wᵢ·cᵢ / Σ wᵢ` over the components present for the candidate,
//! then `final = clamp(base × penalty, 0, 1)`. Ties break by vector
//! component, then lexical, then company id, so a fixed snapshot always
//! produces the same ordering.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{ComponentScores, FusionWeights, MatchOutcome, ScoredCandidate};

use std::cmp::Ordering;

use crate::eligibility::{FiredRule, PenaltyRule};

/// Fuses the present components under renormalized weights.
///
/// A candidate missing a component is scored on the remaining ones with
/// their weights rescaled to sum to 1; absence is not a penalty. All
/// components absent fuses to 0.0.
pub fn fuse(components: &ComponentScores, weights: &FusionWeights) -> f32 {
    let pairs = [
        (components.vector, weights.vector),
        (components.lexical, weights.lexical),
        (components.semantic, weights.semantic),
    ];

    let mut weighted_sum = 0.0f32;
    let mut weight_total = 0.0f32;

    for (component, weight) in pairs {
        if let Some(value) = component {
            weighted_sum += weight * value;
            weight_total += weight;
        }
    }

    if weight_total <= 0.0 {
        return 0.0;
    }

    (weighted_sum / weight_total).clamp(0.0, 1.0)
}

/// Ranks all candidates and keeps the top `top_k`.
pub fn aggregate(
    incentive_id: &str,
    candidates: Vec<ScoredCandidate>,
    weights: &FusionWeights,
    top_k: usize,
) -> Vec<MatchOutcome> {
    let mut outcomes: Vec<MatchOutcome> = candidates
        .into_iter()
        .map(|candidate| {
            let base = fuse(&candidate.components, weights);
            let final_score = (base * candidate.penalty.factor).clamp(0.0, 1.0);
            let explanations = build_explanations(&candidate, weights);

            MatchOutcome {
                incentive_id: incentive_id.to_string(),
                company_id: candidate.company_id,
                company_name: candidate.company_name,
                components: candidate.components,
                penalty: candidate.penalty,
                final_score,
                rank: 0,
                explanations,
            }
        })
        .collect();

    outcomes.sort_by(compare_outcomes);
    outcomes.truncate(top_k);

    for (position, outcome) in outcomes.iter_mut().enumerate() {
        outcome.rank = position + 1;
    }

    outcomes
}

/// Total order over outcomes: final score desc, vector desc, lexical desc,
/// company id asc. Absent components sort below present ones.
fn compare_outcomes(a: &MatchOutcome, b: &MatchOutcome) -> Ordering {
    descending(a.final_score, b.final_score)
        .then_with(|| descending_opt(a.components.vector, b.components.vector))
        .then_with(|| descending_opt(a.components.lexical, b.components.lexical))
        .then_with(|| a.company_id.cmp(&b.company_id))
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn descending_opt(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => descending(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Assembles the explanation list: judge bullets when present, otherwise a
/// templated rationale for the dominant component, then fired-rule notes.
fn build_explanations(candidate: &ScoredCandidate, weights: &FusionWeights) -> Vec<String> {
    let mut explanations = Vec::new();

    if candidate.justification.is_empty() {
        if let Some(rationale) = dominant_rationale(&candidate.components, weights) {
            explanations.push(rationale.to_string());
        }
    } else {
        explanations.extend(candidate.justification.iter().cloned());
    }

    for fired in &candidate.penalty.fired {
        explanations.push(penalty_note(fired));
    }

    if explanations.is_empty() {
        explanations.push("Match baseado em semelhança de perfil".to_string());
    }

    explanations
}

/// Names the component contributing the most weighted mass to the base
/// score.
fn dominant_rationale(components: &ComponentScores, weights: &FusionWeights) -> Option<&'static str> {
    let contributions = [
        (
            components.vector.map(|v| v * weights.vector),
            "Elevada semelhança semântica do perfil",
        ),
        (
            components.lexical.map(|v| v * weights.lexical),
            "Forte sobreposição de palavras-chave e setor",
        ),
        (
            components.semantic.map(|v| v * weights.semantic),
            "Avaliação de compatibilidade elevada",
        ),
    ];

    contributions
        .into_iter()
        .filter_map(|(contribution, label)| contribution.map(|c| (c, label)))
        .filter(|(contribution, _)| *contribution > 0.0)
        .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(_, label)| label)
}

fn penalty_note(fired: &FiredRule) -> String {
    let label = match fired.rule {
        PenaltyRule::Size => "dimensão da empresa fora do âmbito",
        PenaltyRule::Sector => "setor sem sobreposição com o incentivo",
        PenaltyRule::Geography => "localização fora da área geográfica",
    };

    format!("Penalização: {} (×{:.2})", label, fired.factor)
}
