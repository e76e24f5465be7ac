//! Append-only review audit records.
//!
//! One record per completed review, built from the states on either side of
//! the scheduler call. The core only constructs the value; persisting it and
//! assigning a unique record identifier belong to the storage collaborator,
//! as does deletion (an external data-management operation).

use serde::{Deserialize, Serialize};

use crate::card::MemoryState;
use crate::scheduler::ReviewOutcome;

/// One entry in the review audit trail. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewHistoryRecord {
    pub card_id: String,
    /// Epoch ms when the review completed.
    pub reviewed_at: i64,
    /// Confidence label, e.g. `"knew"`.
    pub confidence: String,
    /// Measured response time, 0 when latency tracking was disabled.
    pub response_time_ms: i64,
    pub old_interval_days: i64,
    pub new_interval_days: i64,
}

/// Map a completed review onto its audit record.
///
/// Pure field mapping; `now_ms` should be the timestamp handed to the
/// scheduler so `reviewed_at` matches the new state's `last_reviewed_at`.
pub fn record_review(
    card_id: impl Into<String>,
    old: &MemoryState,
    new: &MemoryState,
    outcome: &ReviewOutcome,
    now_ms: i64,
) -> ReviewHistoryRecord {
    ReviewHistoryRecord {
        card_id: card_id.into(),
        reviewed_at: now_ms,
        confidence: outcome.confidence.label().to_string(),
        response_time_ms: outcome.response_time_ms.unwrap_or(0),
        old_interval_days: old.interval_days,
        new_interval_days: new.interval_days,
    }
}
