//! Rule clause evaluation against a single customer record.

use relay_core::types::{Customer, RuleClause, RuleField, RuleOperator};
use relay_core::{RelayError, RelayResult};
use std::cmp::Ordering;

/// Parse a clause value as a number. Unparseable input yields NaN, which
/// fails every comparison except `!=` (see [`compare`]).
fn numeric_value(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Numeric comparison with the NaN policy: a NaN on either side matches
/// nothing under `>`, `<`, `>=`, `<=`, `=` and everything under `!=`.
fn compare(actual: f64, operator: RuleOperator, target: f64) -> bool {
    let ord = actual.partial_cmp(&target);
    match operator {
        RuleOperator::GreaterThan => ord == Some(Ordering::Greater),
        RuleOperator::LessThan => ord == Some(Ordering::Less),
        RuleOperator::GreaterThanOrEqual => {
            matches!(ord, Some(Ordering::Greater | Ordering::Equal))
        }
        RuleOperator::LessThanOrEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        RuleOperator::Equals => ord == Some(Ordering::Equal),
        RuleOperator::NotEquals => ord != Some(Ordering::Equal),
    }
}

/// Evaluate one clause against one customer.
///
/// Only `spend` and `visits` are scored. Every other field passes through
/// unconditionally — the pass-through policy: clauses on fields the
/// evaluator does not score never exclude a customer.
pub fn evaluate(customer: &Customer, clause: &RuleClause) -> bool {
    match clause.field {
        RuleField::Spend => compare(customer.spend, clause.operator, numeric_value(&clause.value)),
        RuleField::Visits => compare(
            customer.visits as f64,
            clause.operator,
            numeric_value(&clause.value),
        ),
        RuleField::LastActive | RuleField::Age | RuleField::Orders | RuleField::Location => true,
    }
}

/// Reject clause lists whose values cannot parse for a scored numeric
/// field. Called by the orchestrator before any persistence; the
/// evaluator itself stays total via the NaN policy.
pub fn validate_clauses(clauses: &[RuleClause]) -> RelayResult<()> {
    for clause in clauses {
        if matches!(clause.field, RuleField::Spend | RuleField::Visits)
            && numeric_value(&clause.value).is_nan()
        {
            return Err(RelayError::Validation(format!(
                "rule value {:?} is not numeric for field {:?}",
                clause.value, clause.field
            )));
        }
    }
    Ok(())
}
