use super::*;

#[test]
fn test_request_budget_allows_within_ceiling() {
    let budget = RequestBudget::new(0.10);

    assert!(budget.may_call(0.02));
    budget.record_cost(0.02);
    assert!(budget.may_call(0.02));
    assert_eq!(budget.spent_eur(), 0.02);
}

#[test]
fn test_request_budget_refuses_over_ceiling() {
    let budget = RequestBudget::new(0.005);

    assert!(budget.may_call(0.002));
    budget.record_cost(0.004);

    assert!(!budget.may_call(0.002));
}

#[test]
fn test_request_budget_refusal_is_sticky_while_spent() {
    let budget = RequestBudget::new(0.004);
    budget.record_cost(0.004);

    for _ in 0..3 {
        assert!(!budget.may_call(0.002));
    }
}

#[test]
fn test_zero_ceiling_refuses_everything() {
    let budget = RequestBudget::new(0.0);
    assert!(!budget.may_call(ESTIMATED_ASSESSMENT_COST_EUR));
}

#[test]
fn test_unmetered_always_allows() {
    let guard = Unmetered;
    assert!(guard.may_call(f64::MAX));
    guard.record_cost(1.0);
    assert!(guard.may_call(1.0));
}
