//! Pure counter math for campaign delivery progress.

use relay_core::types::Campaign;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryProgress {
    /// Share of the audience whose log reached a terminal state, 0–100.
    pub progress_pct: f64,
    /// Share of terminal logs that were sent successfully, 0–100.
    pub success_rate_pct: f64,
}

/// Compute progress from campaign counters alone. Pure and side-effect
/// free; callers re-invoke it on every poll. Both ratios are 0 when their
/// denominator is 0.
pub fn compute_progress(campaign: &Campaign) -> DeliveryProgress {
    let settled = campaign.total_sent + campaign.total_failed;

    let progress_pct = if campaign.audience_size == 0 {
        0.0
    } else {
        100.0 * settled as f64 / campaign.audience_size as f64
    };

    let success_rate_pct = if settled == 0 {
        0.0
    } else {
        100.0 * campaign.total_sent as f64 / settled as f64
    };

    DeliveryProgress {
        progress_pct,
        success_rate_pct,
    }
}
