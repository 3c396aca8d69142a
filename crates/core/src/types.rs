use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer record as seen by the segmentation pipeline.
///
/// Created once via the customer directory and treated as immutable
/// afterwards; the delivery pipeline never writes back to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub spend: f64,
    pub visits: u64,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields a rule clause may target. Only `Spend` and `Visits` are scored
/// by the evaluator; the remaining fields are accepted by the rule builder
/// but pass through evaluation unconditionally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RuleField {
    Spend,
    Visits,
    LastActive,
    Age,
    Orders,
    Location,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
}

/// Logical relation between a clause and the *next* clause in sequence.
/// Display-only: the resolver combines every clause with AND regardless.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleConnector {
    And,
    Or,
}

/// One clause of a user-authored segment rule set. `value` is kept as the
/// raw string the user typed and parsed per the field's type at
/// evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleClause {
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<RuleConnector>,
}

impl RuleClause {
    pub fn new(field: RuleField, operator: RuleOperator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
            connector: None,
        }
    }
}

/// Denormalized rule snapshot embedded in a campaign. Connectors are not
/// persisted: they carry no evaluation semantics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentRule {
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: String,
}

impl From<&RuleClause> for SegmentRule {
    fn from(clause: &RuleClause) -> Self {
        Self {
            field: clause.field,
            operator: clause.operator,
            value: clause.value.clone(),
        }
    }
}

/// Campaign lifecycle. Transitions are forward-only and driven by
/// aggregate communication-log state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Pending,
    Sending,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Returns `true` if the given transition is allowed. Statuses never
    /// regress and terminal statuses never change.
    pub fn can_transition(self, to: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, to),
            (Pending, Sending) | (Pending, Failed) | (Sending, Completed) | (Sending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }
}

/// A campaign record. Created by the orchestrator; only delivery progress
/// mutates the counters and status afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub segment_name: String,
    pub segment_rules: Vec<SegmentRule>,
    pub audience_size: u64,
    pub status: CampaignStatus,
    pub total_sent: u64,
    pub total_failed: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Pending,
    Sent,
    Failed,
}

impl LogStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, LogStatus::Sent | LogStatus::Failed)
    }
}

/// One outbound message attempt for one (campaign, customer) pair.
/// `customer_name` is a snapshot taken at initiation, not a live join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationLog {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub message: String,
    pub status: LogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_forward_only() {
        use CampaignStatus::*;
        assert!(Pending.can_transition(Sending));
        assert!(Pending.can_transition(Failed));
        assert!(Sending.can_transition(Completed));
        assert!(Sending.can_transition(Failed));

        assert!(!Sending.can_transition(Pending));
        assert!(!Completed.can_transition(Sending));
        assert!(!Completed.can_transition(Failed));
        assert!(!Failed.can_transition(Pending));
        assert!(!Pending.can_transition(Completed));
    }

    #[test]
    fn test_campaign_serialized_field_names() {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            name: "Campaign for VIPs".into(),
            segment_name: "VIPs".into(),
            segment_rules: vec![SegmentRule {
                field: RuleField::Spend,
                operator: RuleOperator::GreaterThan,
                value: "10000".into(),
            }],
            audience_size: 3,
            status: CampaignStatus::Pending,
            total_sent: 0,
            total_failed: 0,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&campaign).unwrap();
        assert!(json.get("segmentName").is_some());
        assert!(json.get("audienceSize").is_some());
        assert!(json.get("totalSent").is_some());
        assert!(json.get("totalFailed").is_some());
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["segmentRules"][0]["operator"], ">");
        assert_eq!(json["segmentRules"][0]["field"], "spend");
    }

    #[test]
    fn test_rule_clause_round_trips_symbol_operators() {
        let clause: RuleClause =
            serde_json::from_str(r#"{"field":"visits","operator":"<","value":"3","connector":"AND"}"#)
                .unwrap();
        assert_eq!(clause.field, RuleField::Visits);
        assert_eq!(clause.operator, RuleOperator::LessThan);
        assert_eq!(clause.connector, Some(RuleConnector::And));
    }

    #[test]
    fn test_log_serialized_field_names() {
        let now = Utc::now();
        let log = CommunicationLog {
            id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            customer_name: "Asha".into(),
            message: "Hi Asha, here's 10% off on your next order!".into(),
            status: LogStatus::Pending,
            sent_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&log).unwrap();
        assert!(json.get("campaignId").is_some());
        assert!(json.get("customerId").is_some());
        assert!(json.get("customerName").is_some());
        assert_eq!(json["status"], "PENDING");
        // Nullable timestamps are omitted until set.
        assert!(json.get("sentAt").is_none());
    }
}
