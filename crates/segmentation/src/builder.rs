//! Segment builder — fluent API for constructing rule-based segments.

use crate::resolver::resolve_audience;
use chrono::{DateTime, Utc};
use relay_core::types::{Customer, RuleClause, RuleConnector, RuleField, RuleOperator};
use serde::{Deserialize, Serialize};

/// A named, read-only rule set. Once built it only serves as the source
/// of the rule snapshot embedded in a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub name: String,
    pub rules: Vec<RuleClause>,
    /// Authoritative audience count, filled in once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_size: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Segment {
    /// Resolve this segment's audience against a customer set.
    pub fn resolve(&self, customers: &[Customer]) -> Vec<Customer> {
        resolve_audience(customers, &self.rules)
    }
}

pub struct SegmentBuilder {
    name: String,
    rules: Vec<RuleClause>,
    connector: RuleConnector,
}

impl SegmentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            connector: RuleConnector::And,
        }
    }

    /// Display clauses as OR-connected. Evaluation still ANDs every
    /// clause; the connector is cosmetic.
    pub fn with_or(mut self) -> Self {
        self.connector = RuleConnector::Or;
        self
    }

    pub fn clause(
        mut self,
        field: RuleField,
        operator: RuleOperator,
        value: impl Into<String>,
    ) -> Self {
        self.rules.push(RuleClause::new(field, operator, value));
        self
    }

    pub fn spend_gt(self, value: impl ToString) -> Self {
        self.clause(RuleField::Spend, RuleOperator::GreaterThan, value.to_string())
    }

    pub fn spend_lt(self, value: impl ToString) -> Self {
        self.clause(RuleField::Spend, RuleOperator::LessThan, value.to_string())
    }

    pub fn visits_gt(self, value: impl ToString) -> Self {
        self.clause(RuleField::Visits, RuleOperator::GreaterThan, value.to_string())
    }

    pub fn visits_lt(self, value: impl ToString) -> Self {
        self.clause(RuleField::Visits, RuleOperator::LessThan, value.to_string())
    }

    pub fn build(self) -> Segment {
        let connector = self.connector;
        let len = self.rules.len();
        let rules = self
            .rules
            .into_iter()
            .enumerate()
            .map(|(i, mut clause)| {
                // Every clause except the last names its relation to the next.
                clause.connector = (i + 1 < len).then_some(connector);
                clause
            })
            .collect();

        Segment {
            name: self.name,
            rules,
            audience_size: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn customer(spend: f64, visits: u64) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            spend,
            visits,
            last_active: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_builder_assigns_connectors_between_clauses() {
        let segment = SegmentBuilder::new("High Value")
            .spend_gt(10_000)
            .visits_lt(3)
            .build();

        assert_eq!(segment.rules.len(), 2);
        assert_eq!(segment.rules[0].connector, Some(RuleConnector::And));
        assert_eq!(segment.rules[1].connector, None);
    }

    #[test]
    fn test_or_connector_is_display_only() {
        let segment = SegmentBuilder::new("Either")
            .with_or()
            .spend_gt(10_000)
            .visits_lt(3)
            .build();
        assert_eq!(segment.rules[0].connector, Some(RuleConnector::Or));

        // Matches spend but not visits: OR display, AND semantics.
        let customers = vec![customer(20_000.0, 10)];
        assert!(segment.resolve(&customers).is_empty());
    }

    #[test]
    fn test_segment_resolves_audience() {
        let segment = SegmentBuilder::new("Big Spenders").spend_gt(10_000).build();
        let customers = vec![customer(15_000.0, 1), customer(5_000.0, 10)];
        let audience = segment.resolve(&customers);
        assert_eq!(audience.len(), 1);
    }
}
