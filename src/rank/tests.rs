use super::*;
use crate::eligibility::{FiredRule, Penalty, PenaltyRule};

fn candidate(id: &str, components: ComponentScores, penalty: Penalty) -> ScoredCandidate {
    ScoredCandidate {
        company_id: id.into(),
        company_name: format!("Company {id}"),
        components,
        penalty,
        justification: vec![],
    }
}

fn components(vector: Option<f32>, lexical: Option<f32>, semantic: Option<f32>) -> ComponentScores {
    ComponentScores {
        vector,
        lexical,
        semantic,
    }
}

#[test]
fn test_fuse_all_components_present() {
    let weights = FusionWeights::default();
    let score = fuse(&components(Some(1.0), Some(1.0), Some(1.0)), &weights);
    assert!((score - 1.0).abs() < 1e-6);

    let score = fuse(&components(Some(0.8), Some(0.5), Some(0.6)), &weights);
    let expected = 0.55 * 0.8 + 0.20 * 0.5 + 0.25 * 0.6;
    assert!((score - expected).abs() < 1e-6);
}

#[test]
fn test_fuse_renormalizes_over_missing_semantic() {
    let weights = FusionWeights::default();
    let score = fuse(&components(Some(0.8), Some(0.5), None), &weights);

    let expected = (0.55 * 0.8 + 0.20 * 0.5) / 0.75;
    assert!((score - expected).abs() < 1e-6);
}

#[test]
fn test_fuse_single_component_carries_full_weight() {
    let weights = FusionWeights::default();
    let score = fuse(&components(None, Some(0.4), None), &weights);
    assert!((score - 0.4).abs() < 1e-6);
}

#[test]
fn test_fuse_all_absent_is_zero() {
    let score = fuse(&components(None, None, None), &FusionWeights::default());
    assert_eq!(score, 0.0);
}

#[test]
fn test_fuse_zero_components_are_not_absent() {
    let weights = FusionWeights::default();
    let score = fuse(&components(Some(0.0), Some(0.0), None), &weights);
    assert_eq!(score, 0.0);
}

#[test]
fn test_final_score_equals_base_when_penalty_clean() {
    let weights = FusionWeights::default();
    let scored = candidate("a", components(Some(0.9), Some(0.6), Some(0.7)), Penalty::none());
    let base = fuse(&scored.components, &weights);

    let outcomes = aggregate("inc-1", vec![scored], &weights, 5);

    assert_eq!(outcomes[0].final_score, base);
}

#[test]
fn test_penalty_scales_final_score() {
    let weights = FusionWeights::default();
    let penalty = Penalty {
        factor: 0.3,
        fired: vec![
            FiredRule {
                rule: PenaltyRule::Size,
                factor: 0.6,
            },
            FiredRule {
                rule: PenaltyRule::Sector,
                factor: 0.5,
            },
        ],
    };
    let scored = candidate("a", components(Some(1.0), Some(1.0), Some(1.0)), penalty);

    let outcomes = aggregate("inc-1", vec![scored], &weights, 5);

    assert!((outcomes[0].final_score - 0.3).abs() < 1e-6);
}

#[test]
fn test_penalized_twin_ranks_below_clean_twin() {
    // Same vector similarity; only eligibility separates them.
    let weights = FusionWeights::default();
    let clean = candidate("a", components(Some(0.9), Some(0.8), None), Penalty::none());
    let penalized = candidate(
        "b",
        components(Some(0.9), Some(0.8), None),
        Penalty {
            factor: 0.6 * 0.5,
            fired: vec![
                FiredRule {
                    rule: PenaltyRule::Size,
                    factor: 0.6,
                },
                FiredRule {
                    rule: PenaltyRule::Sector,
                    factor: 0.5,
                },
            ],
        },
    );

    let outcomes = aggregate("inc-1", vec![penalized, clean], &weights, 5);

    assert_eq!(outcomes[0].company_id, "a");
    assert_eq!(outcomes[1].company_id, "b");
    assert!(outcomes[1].final_score <= 0.3 * outcomes[0].final_score + 1e-6);
}

#[test]
fn test_tie_breaks_by_vector_then_lexical_then_id() {
    let weights = FusionWeights {
        vector: 0.5,
        lexical: 0.5,
        semantic: 0.0,
    };

    // Same final score (0.5 each, exactly representable), different
    // vector/lexical splits.
    let high_vector = candidate("c", components(Some(0.75), Some(0.25), None), Penalty::none());
    let high_lexical = candidate("b", components(Some(0.25), Some(0.75), None), Penalty::none());
    let balanced_z = candidate("z", components(Some(0.5), Some(0.5), None), Penalty::none());
    let balanced_a = candidate("a", components(Some(0.5), Some(0.5), None), Penalty::none());

    let outcomes = aggregate(
        "inc-1",
        vec![balanced_z, high_lexical, high_vector, balanced_a],
        &weights,
        5,
    );

    let ids: Vec<&str> = outcomes.iter().map(|o| o.company_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "z", "b"]);
}

#[test]
fn test_ranks_are_one_based_and_contiguous() {
    let weights = FusionWeights::default();
    let candidates = (0..4)
        .map(|i| {
            candidate(
                &format!("co-{i}"),
                components(Some(0.1 * i as f32), Some(0.5), None),
                Penalty::none(),
            )
        })
        .collect();

    let outcomes = aggregate("inc-1", candidates, &weights, 3);

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes.iter().map(|o| o.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_all_scores_in_unit_interval() {
    let weights = FusionWeights::default();
    let candidates = vec![
        candidate("a", components(Some(1.0), Some(1.0), Some(1.0)), Penalty::none()),
        candidate("b", components(Some(0.0), Some(0.0), None), Penalty::none()),
        candidate(
            "c",
            components(None, Some(0.3), None),
            Penalty {
                factor: 0.21,
                fired: vec![],
            },
        ),
    ];

    for outcome in aggregate("inc-1", candidates, &weights, 10) {
        assert!((0.0..=1.0).contains(&outcome.final_score));
    }
}

#[test]
fn test_zero_signal_candidate_ranks_bottom_but_survives() {
    let weights = FusionWeights::default();
    let strong = candidate("a", components(Some(0.9), Some(0.7), None), Penalty::none());
    let zero = candidate("z", components(Some(0.0), Some(0.0), None), Penalty::none());

    let outcomes = aggregate("inc-1", vec![zero, strong], &weights, 5);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[1].company_id, "z");
    assert_eq!(outcomes[1].final_score, 0.0);
    assert_eq!(outcomes[1].components.vector, Some(0.0));
}

#[test]
fn test_judge_bullets_take_explanation_precedence() {
    let weights = FusionWeights::default();
    let mut scored = candidate("a", components(Some(0.9), Some(0.5), Some(0.8)), Penalty::none());
    scored.justification = vec!["Área relevante".to_string(), "Localização adequada".to_string()];

    let outcomes = aggregate("inc-1", vec![scored], &weights, 5);

    assert_eq!(outcomes[0].explanations[0], "Área relevante");
    assert_eq!(outcomes[0].explanations[1], "Localização adequada");
}

#[test]
fn test_templated_rationale_names_dominant_component() {
    let weights = FusionWeights::default();
    let scored = candidate("a", components(Some(0.9), Some(0.1), None), Penalty::none());

    let outcomes = aggregate("inc-1", vec![scored], &weights, 5);

    assert!(outcomes[0].explanations[0].contains("semelhança semântica"));
}

#[test]
fn test_fired_rules_appended_to_explanations() {
    let weights = FusionWeights::default();
    let scored = candidate(
        "a",
        components(Some(0.9), Some(0.5), None),
        Penalty {
            factor: 0.5,
            fired: vec![FiredRule {
                rule: PenaltyRule::Sector,
                factor: 0.5,
            }],
        },
    );

    let outcomes = aggregate("inc-1", vec![scored], &weights, 5);

    let last = outcomes[0].explanations.last().unwrap();
    assert!(last.contains("setor"));
    assert!(last.contains("0.50"));
}

#[test]
fn test_aggregate_is_deterministic() {
    let weights = FusionWeights::default();
    let make = || {
        vec![
            candidate("a", components(Some(0.5), Some(0.5), None), Penalty::none()),
            candidate("b", components(Some(0.5), Some(0.5), None), Penalty::none()),
            candidate("c", components(Some(0.7), Some(0.2), None), Penalty::none()),
        ]
    };

    let first = aggregate("inc-1", make(), &weights, 5);
    let second = aggregate("inc-1", make(), &weights, 5);

    let order = |outcomes: &[MatchOutcome]| {
        outcomes
            .iter()
            .map(|o| o.company_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
}
