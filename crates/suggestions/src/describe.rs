//! Human-readable audience descriptions from rule clauses.

use relay_core::types::{RuleClause, RuleField, RuleOperator};

fn field_label(field: RuleField) -> &'static str {
    match field {
        RuleField::Spend => "total spend",
        RuleField::Visits => "page visits",
        RuleField::LastActive => "days since last active",
        RuleField::Age => "age",
        RuleField::Orders => "total orders",
        RuleField::Location => "location",
    }
}

fn operator_label(operator: RuleOperator) -> &'static str {
    match operator {
        RuleOperator::GreaterThan => "greater than",
        RuleOperator::LessThan => "less than",
        RuleOperator::GreaterThanOrEqual => "at least",
        RuleOperator::LessThanOrEqual => "at most",
        RuleOperator::Equals => "equal to",
        RuleOperator::NotEquals => "not equal to",
    }
}

/// Render a rule list as prose, e.g.
/// `"total spend greater than 10000 and page visits less than 3"`.
/// An empty rule list describes everyone.
pub fn describe_audience(rules: &[RuleClause]) -> String {
    if rules.is_empty() {
        return "all customers".to_string();
    }
    rules
        .iter()
        .map(|rule| {
            format!(
                "{} {} {}",
                field_label(rule.field),
                operator_label(rule.operator),
                rule.value
            )
        })
        .collect::<Vec<_>>()
        .join(" and ")
}
