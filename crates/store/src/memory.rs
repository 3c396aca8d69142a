//! In-memory store backed by DashMap.
//!
//! Counter updates happen under the campaign's shard guard, which gives
//! the atomic-increment semantics concurrent log finalization requires.

use crate::models::{NewCampaign, NewCustomer, NewLog};
use crate::{CampaignStore, CustomerDirectory};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use relay_core::types::{Campaign, CampaignStatus, CommunicationLog, Customer, LogStatus};
use relay_core::{RelayError, RelayResult};
use tracing::{debug, info};
use uuid::Uuid;

/// Thread-safe in-memory store for customers, campaigns, and
/// communication logs.
pub struct MemoryStore {
    customers: DashMap<Uuid, Customer>,
    campaigns: DashMap<Uuid, Campaign>,
    logs: DashMap<Uuid, CommunicationLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("Campaign store initialized (in-memory, development mode)");
        Self {
            customers: DashMap::new(),
            campaigns: DashMap::new(),
            logs: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
    async fn list_customers(&self) -> RelayResult<Vec<Customer>> {
        let mut customers: Vec<Customer> =
            self.customers.iter().map(|r| r.value().clone()).collect();
        // Stable creation order so audience resolution is deterministic.
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(customers)
    }

    async fn add_customer(&self, customer: NewCustomer) -> RelayResult<Customer> {
        customer.validate()?;
        let now = Utc::now();
        let record = Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            email: customer.email,
            spend: customer.spend,
            visits: customer.visits,
            last_active: customer.last_active.unwrap_or(now),
            created_at: now,
        };
        self.customers.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn create_campaign(&self, campaign: NewCampaign) -> RelayResult<Campaign> {
        campaign.validate()?;
        let now = Utc::now();
        let record = Campaign {
            id: Uuid::new_v4(),
            name: campaign.name,
            segment_name: campaign.segment_name,
            segment_rules: campaign.segment_rules,
            audience_size: campaign.audience_size,
            status: CampaignStatus::Pending,
            total_sent: 0,
            total_failed: 0,
            created_at: now,
            updated_at: now,
        };
        self.campaigns.insert(record.id, record.clone());
        info!(
            campaign_id = %record.id,
            segment = %record.segment_name,
            audience_size = record.audience_size,
            "campaign created"
        );
        Ok(record)
    }

    async fn list_campaigns(&self) -> RelayResult<Vec<Campaign>> {
        let mut campaigns: Vec<Campaign> =
            self.campaigns.iter().map(|r| r.value().clone()).collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(campaigns)
    }

    async fn get_campaign(&self, id: Uuid) -> RelayResult<Option<Campaign>> {
        Ok(self.campaigns.get(&id).map(|r| r.value().clone()))
    }

    async fn create_log(&self, campaign_id: Uuid, log: NewLog) -> RelayResult<CommunicationLog> {
        log.validate()?;
        if !self.campaigns.contains_key(&campaign_id) {
            return Err(RelayError::Validation(format!(
                "unknown campaign {campaign_id}"
            )));
        }
        let now = Utc::now();
        let record = CommunicationLog {
            id: Uuid::new_v4(),
            campaign_id,
            customer_id: log.customer_id,
            customer_name: log.customer_name,
            message: log.message,
            status: LogStatus::Pending,
            sent_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };
        self.logs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_logs(&self, campaign_id: Uuid) -> RelayResult<Vec<CommunicationLog>> {
        let mut logs: Vec<CommunicationLog> = self
            .logs
            .iter()
            .filter(|r| r.value().campaign_id == campaign_id)
            .map(|r| r.value().clone())
            .collect();
        logs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(logs)
    }

    async fn finalize_log(
        &self,
        log_id: Uuid,
        outcome: LogStatus,
    ) -> RelayResult<CommunicationLog> {
        if !outcome.is_terminal() {
            return Err(RelayError::Validation(
                "log outcome must be SENT or FAILED".into(),
            ));
        }

        let now = Utc::now();
        let (campaign_id, finalized) = {
            let mut entry = self.logs.get_mut(&log_id).ok_or_else(|| {
                RelayError::Validation(format!("unknown communication log {log_id}"))
            })?;
            let log = entry.value_mut();
            if log.status.is_terminal() {
                debug!(log_id = %log_id, status = ?log.status, "log already finalized");
                return Ok(log.clone());
            }
            log.status = outcome;
            log.updated_at = now;
            if outcome == LogStatus::Sent {
                log.sent_at = Some(now);
                log.delivered_at = Some(now);
            }
            (log.campaign_id, log.clone())
        };

        let mut entry = self.campaigns.get_mut(&campaign_id).ok_or_else(|| {
            RelayError::StoreUnavailable(format!(
                "campaign {campaign_id} missing for log {log_id}"
            ))
        })?;
        let campaign = entry.value_mut();
        if campaign.total_sent + campaign.total_failed >= campaign.audience_size {
            return Err(RelayError::Validation(format!(
                "campaign {campaign_id} counters already cover its audience of {}",
                campaign.audience_size
            )));
        }
        match outcome {
            LogStatus::Sent => campaign.total_sent += 1,
            LogStatus::Failed => campaign.total_failed += 1,
            LogStatus::Pending => unreachable!("checked terminal above"),
        }
        // Aggregate log state drives the campaign forward.
        if campaign.status == CampaignStatus::Pending {
            campaign.status = CampaignStatus::Sending;
        }
        if campaign.total_sent + campaign.total_failed == campaign.audience_size
            && campaign.status.can_transition(CampaignStatus::Completed)
        {
            campaign.status = CampaignStatus::Completed;
            info!(campaign_id = %campaign_id, sent = campaign.total_sent, failed = campaign.total_failed, "campaign completed");
        }
        campaign.updated_at = now;

        Ok(finalized)
    }

    async fn advance_status(
        &self,
        campaign_id: Uuid,
        to: CampaignStatus,
    ) -> RelayResult<Campaign> {
        let mut entry = self.campaigns.get_mut(&campaign_id).ok_or_else(|| {
            RelayError::Validation(format!("unknown campaign {campaign_id}"))
        })?;
        let campaign = entry.value_mut();
        if campaign.status == to {
            return Ok(campaign.clone());
        }
        if !campaign.status.can_transition(to) {
            return Err(RelayError::Validation(format!(
                "invalid campaign status transition {:?} -> {:?}",
                campaign.status, to
            )));
        }
        campaign.status = to;
        campaign.updated_at = Utc::now();
        Ok(campaign.clone())
    }
}
