//! Campaign delivery — audience resolution into a campaign record, batched
//! communication-log fan-out, and the simulated message transport.

pub mod orchestrator;
pub mod simulator;

pub use orchestrator::CampaignOrchestrator;
pub use simulator::{DeliveryReport, DeliverySimulator};
