use super::*;
use crate::model::{SizeClass, SizeRequirement};

fn company(size: SizeClass, sectors: &[&str], district: Option<&str>) -> Company {
    Company {
        company_id: "co-1".into(),
        name: "Test Lda".into(),
        sector_codes: sectors.iter().map(|s| s.to_string()).collect(),
        size,
        district: district.map(String::from),
        description: None,
        embedding: None,
    }
}

fn criteria(
    sizes: &[SizeRequirement],
    sectors: &[&str],
    location: Option<&str>,
) -> EligibilityCriteria {
    EligibilityCriteria {
        size_classes: sizes.to_vec(),
        sector_codes: sectors.iter().map(|s| s.to_string()).collect(),
        location: location.map(String::from),
        ..Default::default()
    }
}

#[test]
fn test_empty_criteria_fire_nothing() {
    let penalty = evaluate(
        &EligibilityCriteria::default(),
        &company(SizeClass::Unknown, &[], None),
        &PenaltyConfig::default(),
    );

    assert_eq!(penalty.factor, 1.0);
    assert!(penalty.is_clean());
}

#[test]
fn test_size_mismatch_fires() {
    let criteria = criteria(&[SizeRequirement::Class(SizeClass::Pme)], &[], None);
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Grande, &[], None),
        &PenaltyConfig::default(),
    );

    assert_eq!(penalty.factor, DEFAULT_SIZE_PENALTY);
    assert_eq!(penalty.fired.len(), 1);
    assert_eq!(penalty.fired[0].rule, PenaltyRule::Size);
}

#[test]
fn test_size_wildcard_disables_rule() {
    let criteria = criteria(
        &[
            SizeRequirement::Class(SizeClass::Pme),
            SizeRequirement::NotApplicable,
        ],
        &[],
        None,
    );
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Grande, &[], None),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_sector_disjoint_fires() {
    let criteria = criteria(&[], &["1234"], None);
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &["9999"], None),
        &PenaltyConfig::default(),
    );

    assert_eq!(penalty.factor, DEFAULT_SECTOR_PENALTY);
    assert_eq!(penalty.fired[0].rule, PenaltyRule::Sector);
}

#[test]
fn test_sector_intersection_is_clean() {
    let criteria = criteria(&[], &["1234", "5678"], None);
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &["5678"], None),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_sector_rule_skipped_when_company_has_no_codes() {
    let criteria = criteria(&[], &["1234"], None);
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &[], None),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_geography_direct_district_match() {
    let criteria = criteria(&[], &[], Some("distrito de Lisboa"));
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &[], Some("Lisboa")),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_geography_national_terms_cover_everything() {
    for location in ["Portugal", "âmbito nacional", "todo o país", "todas as regiões"] {
        let criteria = criteria(&[], &[], Some(location));
        let penalty = evaluate(
            &criteria,
            &company(SizeClass::Pme, &[], Some("Bragança")),
            &PenaltyConfig::default(),
        );
        assert!(penalty.is_clean(), "{location} should cover any district");
    }
}

#[test]
fn test_geography_region_table() {
    let cases = [
        ("Algarve", "Faro"),
        ("região Centro", "Coimbra"),
        ("Norte", "Vila Real"),
        ("área de Lisboa", "Setúbal"),
    ];

    for (location, district) in cases {
        let criteria = criteria(&[], &[], Some(location));
        let penalty = evaluate(
            &criteria,
            &company(SizeClass::Pme, &[], Some(district)),
            &PenaltyConfig::default(),
        );
        assert!(penalty.is_clean(), "{location} should cover {district}");
    }
}

#[test]
fn test_geography_mismatch_fires() {
    let criteria = criteria(&[], &[], Some("Algarve"));
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &[], Some("Porto")),
        &PenaltyConfig::default(),
    );

    assert_eq!(penalty.factor, DEFAULT_GEO_PENALTY);
    assert_eq!(penalty.fired[0].rule, PenaltyRule::Geography);
}

#[test]
fn test_geography_accent_insensitive() {
    let criteria = criteria(&[], &[], Some("LISBOA e Setúbal"));
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &[], Some("setúbal")),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_geography_skipped_without_district() {
    let criteria = criteria(&[], &[], Some("Algarve"));
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Pme, &[], None),
        &PenaltyConfig::default(),
    );

    assert!(penalty.is_clean());
}

#[test]
fn test_rules_compose_multiplicatively() {
    let criteria = criteria(
        &[SizeRequirement::Class(SizeClass::Pme)],
        &["1234"],
        Some("Algarve"),
    );
    let penalty = evaluate(
        &criteria,
        &company(SizeClass::Grande, &["9999"], Some("Porto")),
        &PenaltyConfig::default(),
    );

    let expected = DEFAULT_SIZE_PENALTY * DEFAULT_SECTOR_PENALTY * DEFAULT_GEO_PENALTY;
    assert!((penalty.factor - expected).abs() < 1e-6);
    assert_eq!(penalty.fired.len(), 3);
}

#[test]
fn test_penalty_overrides_respected() {
    let config = PenaltyConfig {
        size: 0.9,
        sector: 0.8,
        geography: 0.95,
    };
    let criteria = criteria(&[SizeRequirement::Class(SizeClass::Micro)], &[], None);
    let penalty = evaluate(&criteria, &company(SizeClass::Pme, &[], None), &config);

    assert_eq!(penalty.factor, 0.9);
}

#[test]
fn test_penalty_config_validation() {
    assert!(PenaltyConfig::default().is_valid());
    assert!(
        !PenaltyConfig {
            size: 0.0,
            ..Default::default()
        }
        .is_valid()
    );
    assert!(
        !PenaltyConfig {
            geography: 1.5,
            ..Default::default()
        }
        .is_valid()
    );
}

#[test]
fn test_more_fired_rules_never_increase_factor() {
    let base = evaluate(
        &criteria(&[SizeRequirement::Class(SizeClass::Pme)], &[], None),
        &company(SizeClass::Grande, &["9999"], Some("Porto")),
        &PenaltyConfig::default(),
    );
    let more = evaluate(
        &criteria(&[SizeRequirement::Class(SizeClass::Pme)], &["1234"], None),
        &company(SizeClass::Grande, &["9999"], Some("Porto")),
        &PenaltyConfig::default(),
    );

    assert!(more.factor <= base.factor);
}
