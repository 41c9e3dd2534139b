//! Deterministic eligibility rules.
//!
//! Each rule is an independent multiplier in (0,1]; fired rules compose by
//! product, so a size mismatch combined with a sector mismatch scores lower
//! than either alone. Absent criteria never fire a rule.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::model::{Company, EligibilityCriteria};

/// Default multiplier applied when the company size is outside the allowed set.
pub const DEFAULT_SIZE_PENALTY: f32 = 0.6;

/// Default multiplier applied when the sector code sets are disjoint.
pub const DEFAULT_SECTOR_PENALTY: f32 = 0.5;

/// Default multiplier applied when the incentive geography does not cover the
/// company district.
pub const DEFAULT_GEO_PENALTY: f32 = 0.7;

/// Identifies which rule produced a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyRule {
    Size,
    Sector,
    Geography,
}

impl PenaltyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyRule::Size => "size",
            PenaltyRule::Sector => "sector",
            PenaltyRule::Geography => "geography",
        }
    }
}

/// One fired rule and the multiplier it contributed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiredRule {
    pub rule: PenaltyRule,
    pub factor: f32,
}

/// The composed penalty for one (incentive, company) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    /// Product of all fired multipliers; 1.0 when nothing fired.
    pub factor: f32,
    /// Rules that fired, in evaluation order.
    pub fired: Vec<FiredRule>,
}

impl Penalty {
    /// A penalty with no fired rules.
    pub fn none() -> Self {
        Self {
            factor: 1.0,
            fired: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Per-rule multiplier overrides.
///
/// Values must be in (0,1]; a multiplier of 1.0 disables the rule's effect
/// while still recording it as fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    pub size: f32,
    pub sector: f32,
    pub geography: f32,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE_PENALTY,
            sector: DEFAULT_SECTOR_PENALTY,
            geography: DEFAULT_GEO_PENALTY,
        }
    }
}

impl PenaltyConfig {
    /// Returns `true` when every multiplier is in (0,1].
    pub fn is_valid(&self) -> bool {
        [self.size, self.sector, self.geography]
            .iter()
            .all(|&p| p > 0.0 && p <= 1.0)
    }
}

/// Evaluates all eligibility rules for one company. Pure and total: no rule
/// ever raises, and absent criteria on either side mean "rule does not
/// apply".
pub fn evaluate(
    criteria: &EligibilityCriteria,
    company: &Company,
    config: &PenaltyConfig,
) -> Penalty {
    let mut penalty = Penalty::none();

    if size_rule_fires(criteria, company) {
        apply(&mut penalty, PenaltyRule::Size, config.size);
    }

    if sector_rule_fires(criteria, company) {
        apply(&mut penalty, PenaltyRule::Sector, config.sector);
    }

    if geography_rule_fires(criteria, company) {
        apply(&mut penalty, PenaltyRule::Geography, config.geography);
    }

    penalty
}

fn apply(penalty: &mut Penalty, rule: PenaltyRule, factor: f32) {
    penalty.factor *= factor;
    penalty.fired.push(FiredRule { rule, factor });
}

fn size_rule_fires(criteria: &EligibilityCriteria, company: &Company) -> bool {
    !criteria.size_classes.is_empty() && !criteria.allows_size(company.size)
}

fn sector_rule_fires(criteria: &EligibilityCriteria, company: &Company) -> bool {
    if criteria.sector_codes.is_empty() || company.sector_codes.is_empty() {
        return false;
    }
    !criteria
        .sector_codes
        .iter()
        .any(|code| company.sector_codes.contains(code))
}

fn geography_rule_fires(criteria: &EligibilityCriteria, company: &Company) -> bool {
    let (Some(location), Some(district)) = (&criteria.location, &company.district) else {
        return false;
    };

    let location = fold(location);
    let district = fold(district);

    if location.is_empty() || district.is_empty() {
        return false;
    }

    !location_covers(&location, &district)
}

/// National descriptors that cover every district.
const NATIONAL_TERMS: &[&str] = &["portugal", "nacional", "todo o pais", "todas as regioes"];

/// Region names and the districts they cover. Extend as new descriptors
/// show up in extracted incentives.
const REGION_DISTRICTS: &[(&str, &[&str])] = &[
    ("algarve", &["faro"]),
    ("centro", &["coimbra", "leiria", "aveiro"]),
    ("norte", &["porto", "braga", "vila real"]),
    ("lisboa", &["lisboa", "setubal"]),
];

fn location_covers(location: &str, district: &str) -> bool {
    if location.contains(district) {
        return true;
    }

    if NATIONAL_TERMS.iter().any(|term| location.contains(term)) {
        return true;
    }

    REGION_DISTRICTS.iter().any(|(region, districts)| {
        location.contains(region) && districts.contains(&district)
    })
}

/// Lowercases and strips diacritics so "Setúbal" matches "setubal".
fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}
