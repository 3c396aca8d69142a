//! Read-side delivery status reporting — progress and success-rate
//! aggregation over campaign counters.

pub mod progress;
pub mod status;

pub use progress::{compute_progress, DeliveryProgress};
pub use status::{CampaignStatusRow, StatusReporter};
