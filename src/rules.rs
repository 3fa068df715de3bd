//! Constraint rule checks.
//!
//! Field-level checks run on a single rule before it reaches the store; the
//! set-level validator runs over all of a tenant's rules plus the candidate.

use crate::data::{ConstraintRule, RuleCategory};
use std::collections::HashSet;

pub const MIN_WEIGHT: u32 = 1;
pub const MAX_WEIGHT: u32 = 100;
/// HARD rules must carry at least this weight.
pub const HARD_MIN_WEIGHT: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleViolation {
    pub kind: RuleViolationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolationKind {
    /// Two rules share (tenant_id, name).
    DuplicateName,
    /// A HARD rule is below `HARD_MIN_WEIGHT`.
    HardWeightTooLow,
}

/// Rejects weights outside `[MIN_WEIGHT, MAX_WEIGHT]`.
pub fn check_weight(rule: &ConstraintRule) -> Result<(), String> {
    if (MIN_WEIGHT..=MAX_WEIGHT).contains(&rule.weight) {
        Ok(())
    } else {
        Err(format!(
            "Rule '{}' weight {} is outside {}..={}",
            rule.name, rule.weight, MIN_WEIGHT, MAX_WEIGHT
        ))
    }
}

/// Returns every violation in rule order; empty means the set is valid.
pub fn validate_constraints<'a, I>(rules: I) -> Vec<RuleViolation>
where
    I: IntoIterator<Item = &'a ConstraintRule>,
{
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for rule in rules {
        if !seen.insert((rule.tenant_id.as_str(), rule.name.as_str())) {
            violations.push(RuleViolation {
                kind: RuleViolationKind::DuplicateName,
                message: format!("Duplicate rule name detected for tenant: {}", rule.name),
            });
        }
        if rule.category == RuleCategory::Hard && rule.weight < HARD_MIN_WEIGHT {
            violations.push(RuleViolation {
                kind: RuleViolationKind::HardWeightTooLow,
                message: format!(
                    "Hard rule '{}' must have weight >= {}",
                    rule.name, HARD_MIN_WEIGHT
                ),
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(tenant: &str, name: &str, category: RuleCategory, weight: u32) -> ConstraintRule {
        ConstraintRule {
            rule_id: format!("R-{}", name),
            tenant_id: tenant.to_string(),
            name: name.to_string(),
            category,
            weight,
            enabled: true,
            params: Default::default(),
        }
    }

    #[test]
    fn hard_rule_below_floor_is_reported() {
        let rules = [rule("t1", "No Faculty Clash", RuleCategory::Hard, 40)];
        let violations = validate_constraints(&rules);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, RuleViolationKind::HardWeightTooLow);
        assert_eq!(violations[0].message, "Hard rule 'No Faculty Clash' must have weight >= 50");
    }

    #[test]
    fn hard_rule_at_floor_is_valid() {
        let rules = [rule("t1", "No Faculty Clash", RuleCategory::Hard, 50)];
        assert!(validate_constraints(&rules).is_empty());
    }

    #[test]
    fn soft_rule_may_be_light() {
        let rules = [rule("t1", "Prefer Mornings", RuleCategory::Soft, 1)];
        assert!(validate_constraints(&rules).is_empty());
    }

    #[test]
    fn duplicate_names_are_per_tenant() {
        let rules = [
            rule("t1", "Lunch Break", RuleCategory::Soft, 10),
            rule("t2", "Lunch Break", RuleCategory::Soft, 10),
            rule("t1", "Lunch Break", RuleCategory::Hard, 20),
        ];
        let kinds: Vec<RuleViolationKind> =
            validate_constraints(&rules).into_iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![RuleViolationKind::DuplicateName, RuleViolationKind::HardWeightTooLow]
        );
    }

    #[test]
    fn weight_range() {
        assert!(check_weight(&rule("t1", "a", RuleCategory::Soft, 0)).is_err());
        assert!(check_weight(&rule("t1", "a", RuleCategory::Soft, 1)).is_ok());
        assert!(check_weight(&rule("t1", "a", RuleCategory::Soft, 100)).is_ok());
        assert!(check_weight(&rule("t1", "a", RuleCategory::Soft, 101)).is_err());
    }
}
