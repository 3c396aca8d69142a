//! Segment Relay — rule-based customer segmentation and campaign delivery.
//!
//! Demo entry point: seeds a customer directory, builds a segment, creates
//! a campaign for it, runs the simulated transport, and polls delivery
//! progress until the campaign settles.

use clap::Parser;
use rand::Rng;
use relay_core::config::AppConfig;
use relay_delivery::{CampaignOrchestrator, DeliverySimulator};
use relay_reporting::StatusReporter;
use relay_segmentation::SegmentBuilder;
use relay_store::{CustomerDirectory, MemoryStore, NewCustomer};
use relay_suggestions::{suggest_or_fallback, SuggestionRequest, TemplateSuggestionProvider};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "segment-relay")]
#[command(about = "Rule-based customer segmentation and campaign delivery pipeline")]
#[command(version)]
struct Cli {
    /// Log-write batch size (overrides config)
    #[arg(long, env = "SEGMENT_RELAY__DELIVERY__BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Simulated delivery success rate, 0.0–1.0 (overrides config)
    #[arg(long, env = "SEGMENT_RELAY__DELIVERY__SUCCESS_RATE")]
    success_rate: Option<f64>,

    /// Number of demo customers to seed
    #[arg(long, default_value_t = 120)]
    seed_customers: usize,

    /// Segment name for the demo campaign
    #[arg(long, default_value = "High Value Shoppers")]
    segment_name: String,

    /// Minimum spend for segment membership
    #[arg(long, default_value_t = 10_000.0)]
    min_spend: f64,

    /// Maximum visits for segment membership (exclusive)
    #[arg(long, default_value_t = 3)]
    max_visits: u64,

    /// Custom campaign message; suggested copy is used when omitted
    #[arg(long)]
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segment_relay=info,relay_delivery=info,relay_store=info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Segment Relay starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(batch_size) = cli.batch_size {
        config.delivery.batch_size = batch_size;
    }
    if let Some(success_rate) = cli.success_rate {
        config.delivery.success_rate = success_rate;
    }

    info!(
        node_id = %config.node_id,
        batch_size = config.delivery.batch_size,
        success_rate = config.delivery.success_rate,
        "Configuration loaded"
    );

    let store = Arc::new(MemoryStore::new());
    seed_customers(&store, cli.seed_customers).await?;

    let segment = SegmentBuilder::new(cli.segment_name.as_str())
        .spend_gt(cli.min_spend)
        .visits_lt(cli.max_visits)
        .build();

    // Suggested copy for the campaign; failures fall back to templates.
    let mut message = cli.message;
    if message.is_none() && config.suggestions.enabled {
        let customers = store.list_customers().await?;
        let request = SuggestionRequest {
            objective: "Re-engage high-value customers".into(),
            audience_rules: segment.rules.clone(),
            audience_size: segment.resolve(&customers).len() as u64,
        };
        let suggestions = suggest_or_fallback(&TemplateSuggestionProvider, &request).await;
        for suggestion in &suggestions {
            info!(tone = ?suggestion.tone, message = %suggestion.message, "suggested copy");
        }
        message = suggestions.first().map(|s| s.message.clone());
    }

    let orchestrator =
        CampaignOrchestrator::new(store.clone(), store.clone(), &config.delivery);
    let campaign = orchestrator
        .create_campaign(&segment.name, &segment.rules, message.as_deref())
        .await?;
    info!(
        campaign_id = %campaign.id,
        audience_size = campaign.audience_size,
        "campaign created"
    );

    if campaign.audience_size == 0 {
        info!("segment matched no customers, nothing to deliver");
        return Ok(());
    }

    // Poll until the campaign settles. Log population runs in the
    // background, so each tick finalizes whatever is pending by then.
    let simulator = DeliverySimulator::new(store.clone(), &config.delivery);
    let reporter = StatusReporter::new(store.clone());
    let interval = std::time::Duration::from_millis(config.delivery.poll_interval_ms.min(200));
    for _ in 0..100 {
        tokio::time::sleep(interval).await;
        simulator.run(campaign.id).await?;

        let progress = reporter.progress(campaign.id).await?;
        info!(
            progress_pct = progress.progress_pct,
            success_rate_pct = progress.success_rate_pct,
            "delivery progress"
        );
        if reporter.is_settled(campaign.id).await? {
            break;
        }
    }

    for row in reporter.overview().await? {
        info!(
            campaign = %row.name,
            status = ?row.status,
            sent = row.total_sent,
            failed = row.total_failed,
            success_rate_pct = row.progress.success_rate_pct,
            "campaign summary"
        );
    }

    Ok(())
}

/// Seed the directory with demo customers spanning the segment boundary.
async fn seed_customers(store: &Arc<MemoryStore>, count: usize) -> anyhow::Result<()> {
    let first_names = [
        "Asha", "Ravi", "Priya", "Arjun", "Meera", "Karan", "Divya", "Rahul", "Sneha", "Vikram",
    ];
    for i in 0..count {
        let (spend, visits) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(0.0..25_000.0), rng.gen_range(0..12))
        };
        let name = format!("{} {}", first_names[i % first_names.len()], i);
        store
            .add_customer(NewCustomer {
                name: name.clone(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                spend,
                visits,
                last_active: None,
            })
            .await?;
    }
    info!(count, "demo customers seeded");
    Ok(())
}
