//! Audience resolution — applies the rule evaluator across the full
//! customer set.

use crate::rules::evaluate;
use relay_core::types::{Customer, RuleClause};
use tracing::debug;

/// Resolve the audience for a clause list: a customer is a member iff it
/// satisfies **every** clause (AND across the whole list — the per-clause
/// connector is display-only). Input order is preserved, so the result is
/// deterministic for a given customer set and clause list.
pub fn resolve_audience(customers: &[Customer], clauses: &[RuleClause]) -> Vec<Customer> {
    let audience: Vec<Customer> = customers
        .iter()
        .filter(|customer| clauses.iter().all(|clause| evaluate(customer, clause)))
        .cloned()
        .collect();

    debug!(
        candidates = customers.len(),
        clauses = clauses.len(),
        matched = audience.len(),
        "audience resolved"
    );
    audience
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::types::{RuleField, RuleOperator};
    use chrono::Utc;
    use uuid::Uuid;

    fn customer(name: &str, spend: f64, visits: u64) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            spend,
            visits,
            last_active: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn spend_gt(value: &str) -> RuleClause {
        RuleClause::new(RuleField::Spend, RuleOperator::GreaterThan, value)
    }

    fn visits_lt(value: &str) -> RuleClause {
        RuleClause::new(RuleField::Visits, RuleOperator::LessThan, value)
    }

    #[test]
    fn test_single_clause_filters() {
        let customers = vec![customer("Asha", 15_000.0, 1), customer("Ravi", 5_000.0, 10)];
        let audience = resolve_audience(&customers, &[spend_gt("10000")]);
        assert_eq!(audience.len(), 1);
        assert_eq!(audience[0].name, "Asha");
    }

    #[test]
    fn test_multiple_clauses_are_conjunctive() {
        let customers = vec![customer("Asha", 15_000.0, 1), customer("Ravi", 5_000.0, 10)];
        let audience = resolve_audience(&customers, &[spend_gt("10000"), visits_lt("3")]);
        assert_eq!(audience.len(), 1);
        assert_eq!(audience[0].name, "Asha");
    }

    #[test]
    fn test_membership_equals_per_clause_conjunction() {
        let customers = vec![
            customer("A", 20_000.0, 2),
            customer("B", 8_000.0, 2),
            customer("C", 20_000.0, 9),
        ];
        let clauses = vec![spend_gt("10000"), visits_lt("3")];
        let audience = resolve_audience(&customers, &clauses);
        for c in &customers {
            let expected = clauses.iter().all(|r| crate::rules::evaluate(c, r));
            assert_eq!(audience.iter().any(|m| m.id == c.id), expected);
        }
    }

    #[test]
    fn test_empty_customers_yields_empty() {
        assert!(resolve_audience(&[], &[spend_gt("0")]).is_empty());
    }

    #[test]
    fn test_empty_clauses_matches_everyone() {
        let customers = vec![customer("Asha", 1.0, 1), customer("Ravi", 2.0, 2)];
        let audience = resolve_audience(&customers, &[]);
        assert_eq!(audience.len(), 2);
    }

    #[test]
    fn test_deterministic_and_order_preserving() {
        let customers = vec![
            customer("C1", 12_000.0, 1),
            customer("C2", 11_000.0, 2),
            customer("C3", 13_000.0, 0),
        ];
        let clauses = vec![spend_gt("10000")];
        let first = resolve_audience(&customers, &clauses);
        let second = resolve_audience(&customers, &clauses);
        let first_ids: Vec<_> = first.iter().map(|c| c.id).collect();
        let second_ids: Vec<_> = second.iter().map(|c| c.id).collect();
        assert_eq!(first_ids, second_ids);
        let input_ids: Vec<_> = customers.iter().map(|c| c.id).collect();
        assert_eq!(first_ids, input_ids);
    }

    #[test]
    fn test_non_numeric_clause_excludes_everyone() {
        let customers = vec![customer("Asha", 15_000.0, 1)];
        assert!(resolve_audience(&customers, &[spend_gt("abc")]).is_empty());
    }
}
