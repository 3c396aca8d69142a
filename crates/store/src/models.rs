//! Request models for the store seams.

use chrono::{DateTime, Utc};
use relay_core::types::SegmentRule;
use relay_core::{RelayError, RelayResult};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl NewCustomer {
    pub fn validate(&self) -> RelayResult<()> {
        if self.name.trim().is_empty() {
            return Err(RelayError::Validation("customer name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(RelayError::Validation("customer email is required".into()));
        }
        if !self.spend.is_finite() || self.spend < 0.0 {
            return Err(RelayError::Validation(format!(
                "customer spend must be a non-negative number, got {}",
                self.spend
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,
    pub segment_name: String,
    pub segment_rules: Vec<SegmentRule>,
    pub audience_size: u64,
}

impl NewCampaign {
    pub fn validate(&self) -> RelayResult<()> {
        if self.name.trim().is_empty() {
            return Err(RelayError::Validation("campaign name is required".into()));
        }
        if self.segment_name.trim().is_empty() {
            return Err(RelayError::Validation("segment name is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLog {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub message: String,
}

impl NewLog {
    pub fn validate(&self) -> RelayResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(RelayError::Validation("customer name is required".into()));
        }
        if self.message.trim().is_empty() {
            return Err(RelayError::Validation("log message is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_validation() {
        let mut req = NewCustomer {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            spend: 100.0,
            visits: 2,
            last_active: None,
        };
        assert!(req.validate().is_ok());

        req.spend = -1.0;
        assert!(req.validate().is_err());

        req.spend = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_campaign_requires_names() {
        let req = NewCampaign {
            name: "".into(),
            segment_name: "VIPs".into(),
            segment_rules: vec![],
            audience_size: 0,
        };
        assert!(req.validate().is_err());
    }
}
