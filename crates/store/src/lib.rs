//! Customer directory and campaign store seams.
//!
//! The pipeline talks to its collaborators through the two traits below;
//! [`memory::MemoryStore`] is the in-memory development implementation.
//! Production: replace with PostgreSQL (sqlx) or similar ACID store behind
//! the same traits.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use relay_core::types::{Campaign, CampaignStatus, CommunicationLog, Customer, LogStatus};
use relay_core::RelayResult;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use models::{NewCampaign, NewCustomer, NewLog};

/// Read/write access to the customer set.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn list_customers(&self) -> RelayResult<Vec<Customer>>;
    async fn add_customer(&self, customer: NewCustomer) -> RelayResult<Customer>;
}

/// Durable record of campaigns and their per-customer communication logs.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn create_campaign(&self, campaign: NewCampaign) -> RelayResult<Campaign>;
    async fn list_campaigns(&self) -> RelayResult<Vec<Campaign>>;
    async fn get_campaign(&self, id: Uuid) -> RelayResult<Option<Campaign>>;

    async fn create_log(&self, campaign_id: Uuid, log: NewLog) -> RelayResult<CommunicationLog>;
    async fn list_logs(&self, campaign_id: Uuid) -> RelayResult<Vec<CommunicationLog>>;

    /// Move a pending log to a terminal status and bump the owning
    /// campaign's counters atomically. Idempotent for already-terminal
    /// logs: at-least-once finalization must not double-count.
    async fn finalize_log(&self, log_id: Uuid, outcome: LogStatus)
        -> RelayResult<CommunicationLog>;

    /// Apply a forward-only campaign status transition. Same-status calls
    /// are no-ops; regressions and skips are validation errors.
    async fn advance_status(
        &self,
        campaign_id: Uuid,
        to: CampaignStatus,
    ) -> RelayResult<Campaign>;
}
