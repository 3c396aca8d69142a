//! Delivery event bus — trait for emitting campaign lifecycle events.
//!
//! The orchestrator and the delivery simulator accept an
//! `Arc<dyn EventSink>` so downstream consumers (analytics, webhooks, a
//! future push-based status stream) can observe delivery without the core
//! depending on them.

use crate::types::LogStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryEventType {
    CampaignCreated,
    LogQueued,
    MessageSent,
    MessageFailed,
    DeliveryCompleted,
    DeliveryFailed,
}

impl DeliveryEventType {
    /// Event emitted when a log reaches the given terminal status.
    pub fn for_outcome(outcome: LogStatus) -> Option<Self> {
        match outcome {
            LogStatus::Sent => Some(DeliveryEventType::MessageSent),
            LogStatus::Failed => Some(DeliveryEventType::MessageFailed),
            LogStatus::Pending => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub event_id: Uuid,
    pub event_type: DeliveryEventType,
    pub campaign_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Trait for emitting delivery events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DeliveryEvent);
}

/// No-op sink for callers that don't need event emission.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: DeliveryEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<DeliveryEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<DeliveryEvent> {
        self.events.lock().expect("event bus mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("event bus mutex poisoned").len()
    }

    pub fn count_type(&self, event_type: DeliveryEventType) -> usize {
        self.events
            .lock()
            .expect("event bus mutex poisoned")
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event bus mutex poisoned").clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: DeliveryEvent) {
        self.events.lock().expect("event bus mutex poisoned").push(event);
    }
}

/// Convenience builder for a `DeliveryEvent` with minimal boilerplate.
pub fn make_event(
    event_type: DeliveryEventType,
    campaign_id: Uuid,
    customer_id: Option<Uuid>,
) -> DeliveryEvent {
    DeliveryEvent {
        event_id: Uuid::new_v4(),
        event_type,
        campaign_id,
        customer_id,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op event bus for callers that don't need one.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}
