//! Campaign orchestrator — turns a segment definition into a campaign
//! record plus one communication log per matched customer.
//!
//! The campaign record is returned as soon as it is persisted; log
//! population runs as a background task in fixed-size batches (concurrent
//! within a batch, batches strictly sequential) so peak write load on the
//! store stays bounded.

use relay_core::config::DeliveryConfig;
use relay_core::event_bus::{make_event, noop_sink, DeliveryEventType, EventSink};
use relay_core::types::{Campaign, Customer, RuleClause, SegmentRule};
use relay_core::{RelayError, RelayResult};
use relay_segmentation::{resolve_audience, validate_clauses};
use relay_store::{CampaignStore, CustomerDirectory, NewCampaign, NewLog};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Clone)]
pub struct CampaignOrchestrator {
    directory: Arc<dyn CustomerDirectory>,
    store: Arc<dyn CampaignStore>,
    event_sink: Arc<dyn EventSink>,
    batch_size: usize,
}

impl CampaignOrchestrator {
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        store: Arc<dyn CampaignStore>,
        config: &DeliveryConfig,
    ) -> Self {
        Self {
            directory,
            store,
            event_sink: noop_sink(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Attach an event sink for emitting delivery lifecycle events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Create a campaign for the given segment definition.
    ///
    /// Resolves the audience against the current customer set, persists
    /// the campaign with a frozen `audience_size` and the rule snapshot,
    /// and returns it. Log population continues in the background; its
    /// failures are reported by the delivery routine and never roll the
    /// campaign record back.
    pub async fn create_campaign(
        &self,
        segment_name: &str,
        clauses: &[RuleClause],
        custom_message: Option<&str>,
    ) -> RelayResult<Campaign> {
        if segment_name.trim().is_empty() {
            return Err(RelayError::Validation("segment name is required".into()));
        }
        validate_clauses(clauses)?;

        let customers = self.directory.list_customers().await?;
        let audience = resolve_audience(&customers, clauses);

        let campaign = self
            .store
            .create_campaign(NewCampaign {
                name: format!("Campaign for {segment_name}"),
                segment_name: segment_name.to_string(),
                segment_rules: clauses.iter().map(SegmentRule::from).collect(),
                audience_size: audience.len() as u64,
            })
            .await?;

        metrics::counter!("campaigns.created").increment(1);
        self.event_sink.emit(make_event(
            DeliveryEventType::CampaignCreated,
            campaign.id,
            None,
        ));
        info!(
            campaign_id = %campaign.id,
            segment = %campaign.segment_name,
            audience_size = campaign.audience_size,
            "campaign created, populating logs in background"
        );

        let this = self.clone();
        let created = campaign.clone();
        let message = custom_message.map(str::to_owned);
        tokio::spawn(async move {
            match this
                .populate_logs(&created, &audience, message.as_deref())
                .await
            {
                Ok(written) => {
                    info!(campaign_id = %created.id, written, "log population finished")
                }
                Err(e) => {
                    warn!(campaign_id = %created.id, error = %e, "log population aborted")
                }
            }
        });

        Ok(campaign)
    }

    /// Write one communication log per audience member, in batches.
    ///
    /// Writes within a batch are submitted concurrently with no defined
    /// relative order; batches run strictly one after another, so every
    /// log of batch N exists before any log of batch N+1 is submitted.
    /// A failed write aborts with `PartialDelivery`; logs already written
    /// stay in place (no rollback, no retry).
    pub async fn populate_logs(
        &self,
        campaign: &Campaign,
        audience: &[Customer],
        custom_message: Option<&str>,
    ) -> RelayResult<usize> {
        let expected = audience.len();
        let mut written = 0usize;

        for batch in audience.chunks(self.batch_size) {
            let mut writes = JoinSet::new();
            for customer in batch {
                let store = self.store.clone();
                let campaign_id = campaign.id;
                let log = NewLog {
                    customer_id: customer.id,
                    customer_name: customer.name.clone(),
                    message: message_for(customer, custom_message),
                };
                writes.spawn(async move { store.create_log(campaign_id, log).await });
            }

            let mut batch_error: Option<RelayError> = None;
            while let Some(joined) = writes.join_next().await {
                match joined {
                    Ok(Ok(log)) => {
                        written += 1;
                        metrics::counter!("delivery.logs_created").increment(1);
                        self.event_sink.emit(make_event(
                            DeliveryEventType::LogQueued,
                            campaign.id,
                            Some(log.customer_id),
                        ));
                    }
                    Ok(Err(e)) => {
                        batch_error.get_or_insert(e);
                    }
                    Err(join_error) => {
                        batch_error
                            .get_or_insert(RelayError::Internal(anyhow::Error::new(join_error)));
                    }
                }
            }

            if let Some(reason) = batch_error {
                self.event_sink.emit(make_event(
                    DeliveryEventType::DeliveryFailed,
                    campaign.id,
                    None,
                ));
                return Err(RelayError::PartialDelivery {
                    written,
                    expected,
                    reason: reason.to_string(),
                });
            }
        }

        self.event_sink.emit(make_event(
            DeliveryEventType::DeliveryCompleted,
            campaign.id,
            None,
        ));
        Ok(written)
    }
}

/// Custom message if non-empty, else the per-customer default template.
fn message_for(customer: &Customer, custom_message: Option<&str>) -> String {
    match custom_message {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => format!("Hi {}, here's 10% off on your next order!", customer.name),
    }
}
