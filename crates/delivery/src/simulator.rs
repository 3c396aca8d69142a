//! Simulated message transport.
//!
//! There is no real SMS/email gateway behind this pipeline: pending logs
//! are finalized with a configured success probability, which exercises
//! the same counter and status paths a real delivery receipt would.

use rand::Rng;
use relay_core::config::DeliveryConfig;
use relay_core::event_bus::{make_event, noop_sink, DeliveryEventType, EventSink};
use relay_core::types::{CampaignStatus, LogStatus};
use relay_core::RelayResult;
use relay_store::CampaignStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DeliveryReport {
    pub sent: u64,
    pub failed: u64,
}

pub struct DeliverySimulator {
    store: Arc<dyn CampaignStore>,
    event_sink: Arc<dyn EventSink>,
    success_rate: f64,
}

impl DeliverySimulator {
    pub fn new(store: Arc<dyn CampaignStore>, config: &DeliveryConfig) -> Self {
        Self {
            store,
            event_sink: noop_sink(),
            success_rate: config.success_rate.clamp(0.0, 1.0),
        }
    }

    /// Attach an event sink for emitting per-message events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Finalize every pending log of the campaign with a simulated
    /// outcome. Already-terminal logs are skipped, so repeated runs are
    /// harmless. A store failure mid-run marks the campaign `FAILED` and
    /// surfaces the error.
    pub async fn run(&self, campaign_id: Uuid) -> RelayResult<DeliveryReport> {
        let logs = self.store.list_logs(campaign_id).await?;
        let mut report = DeliveryReport::default();

        for log in logs.into_iter().filter(|l| l.status == LogStatus::Pending) {
            let delivered = rand::thread_rng().gen_bool(self.success_rate);
            let outcome = if delivered {
                LogStatus::Sent
            } else {
                LogStatus::Failed
            };

            match self.store.finalize_log(log.id, outcome).await {
                Ok(finalized) => {
                    match outcome {
                        LogStatus::Sent => {
                            report.sent += 1;
                            metrics::counter!("delivery.messages", "outcome" => "sent")
                                .increment(1);
                        }
                        LogStatus::Failed => {
                            report.failed += 1;
                            metrics::counter!("delivery.messages", "outcome" => "failed")
                                .increment(1);
                        }
                        LogStatus::Pending => {}
                    }
                    if let Some(event_type) = DeliveryEventType::for_outcome(outcome) {
                        self.event_sink.emit(make_event(
                            event_type,
                            campaign_id,
                            Some(finalized.customer_id),
                        ));
                    }
                }
                Err(e) => {
                    warn!(campaign_id = %campaign_id, error = %e, "delivery aborted mid-run");
                    if let Err(advance_err) = self
                        .store
                        .advance_status(campaign_id, CampaignStatus::Failed)
                        .await
                    {
                        warn!(campaign_id = %campaign_id, error = %advance_err, "could not mark campaign failed");
                    }
                    return Err(e);
                }
            }
        }

        info!(
            campaign_id = %campaign_id,
            sent = report.sent,
            failed = report.failed,
            "delivery run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::event_bus::capture_sink;
    use relay_store::{MemoryStore, NewCampaign, NewLog};

    async fn campaign_with_logs(store: &MemoryStore, count: u64) -> Uuid {
        let campaign = store
            .create_campaign(NewCampaign {
                name: "Campaign for Sim".into(),
                segment_name: "Sim".into(),
                segment_rules: vec![],
                audience_size: count,
            })
            .await
            .unwrap();
        for i in 0..count {
            store
                .create_log(
                    campaign.id,
                    NewLog {
                        customer_id: Uuid::new_v4(),
                        customer_name: format!("Customer {i}"),
                        message: "Hello!".into(),
                    },
                )
                .await
                .unwrap();
        }
        campaign.id
    }

    fn config(success_rate: f64) -> DeliveryConfig {
        DeliveryConfig {
            success_rate,
            ..DeliveryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_all_sent_at_full_success_rate() {
        let store = Arc::new(MemoryStore::new());
        let campaign_id = campaign_with_logs(&store, 10).await;

        let sink = capture_sink();
        let simulator =
            DeliverySimulator::new(store.clone(), &config(1.0)).with_event_sink(sink.clone());
        let report = simulator.run(campaign_id).await.unwrap();

        assert_eq!(report.sent, 10);
        assert_eq!(report.failed, 0);
        assert_eq!(sink.count_type(DeliveryEventType::MessageSent), 10);

        let campaign = store.get_campaign(campaign_id).await.unwrap().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.total_sent, 10);
    }

    #[tokio::test]
    async fn test_all_failed_still_completes_campaign() {
        let store = Arc::new(MemoryStore::new());
        let campaign_id = campaign_with_logs(&store, 5).await;

        let simulator = DeliverySimulator::new(store.clone(), &config(0.0));
        let report = simulator.run(campaign_id).await.unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 5);

        // Every log reached a terminal state, so the campaign is complete
        // even though nothing was delivered.
        let campaign = store.get_campaign(campaign_id).await.unwrap().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.total_failed, 5);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let campaign_id = campaign_with_logs(&store, 4).await;

        let simulator = DeliverySimulator::new(store.clone(), &config(1.0));
        simulator.run(campaign_id).await.unwrap();
        let second = simulator.run(campaign_id).await.unwrap();

        assert_eq!(second.sent + second.failed, 0);
        let campaign = store.get_campaign(campaign_id).await.unwrap().unwrap();
        assert_eq!(campaign.total_sent, 4);
    }

    #[tokio::test]
    async fn test_counters_respect_audience_bound() {
        let store = Arc::new(MemoryStore::new());
        let campaign_id = campaign_with_logs(&store, 8).await;

        let simulator = DeliverySimulator::new(store.clone(), &config(0.5));
        let report = simulator.run(campaign_id).await.unwrap();

        let campaign = store.get_campaign(campaign_id).await.unwrap().unwrap();
        assert_eq!(report.sent + report.failed, 8);
        assert_eq!(campaign.total_sent + campaign.total_failed, 8);
        assert!(campaign.total_sent + campaign.total_failed <= campaign.audience_size);
    }
}
