//! Poll-side campaign status snapshots.

use crate::progress::{compute_progress, DeliveryProgress};
use relay_core::types::CampaignStatus;
use relay_core::{RelayError, RelayResult};
use relay_store::CampaignStore;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// One row of the campaign history view: identity, counters, and derived
/// progress at the moment of the poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatusRow {
    pub id: Uuid,
    pub name: String,
    pub segment_name: String,
    pub status: CampaignStatus,
    pub audience_size: u64,
    pub total_sent: u64,
    pub total_failed: u64,
    pub progress: DeliveryProgress,
}

/// Read-side reporter. Every call recomputes from current store state;
/// nothing is cached, so the caller's poll interval is the only staleness.
pub struct StatusReporter {
    store: Arc<dyn CampaignStore>,
}

impl StatusReporter {
    pub fn new(store: Arc<dyn CampaignStore>) -> Self {
        Self { store }
    }

    pub async fn progress(&self, campaign_id: Uuid) -> RelayResult<DeliveryProgress> {
        let campaign = self
            .store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| RelayError::Validation(format!("unknown campaign {campaign_id}")))?;
        Ok(compute_progress(&campaign))
    }

    /// Snapshot of every campaign, newest first.
    pub async fn overview(&self) -> RelayResult<Vec<CampaignStatusRow>> {
        let campaigns = self.store.list_campaigns().await?;
        Ok(campaigns
            .into_iter()
            .map(|c| CampaignStatusRow {
                progress: compute_progress(&c),
                id: c.id,
                name: c.name,
                segment_name: c.segment_name,
                status: c.status,
                audience_size: c.audience_size,
                total_sent: c.total_sent,
                total_failed: c.total_failed,
            })
            .collect())
    }

    /// True once the campaign can make no further progress.
    pub async fn is_settled(&self, campaign_id: Uuid) -> RelayResult<bool> {
        let campaign = self
            .store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| RelayError::Validation(format!("unknown campaign {campaign_id}")))?;
        Ok(campaign.status.is_terminal())
    }
}
