//! Card records and per-card memory state.
//!
//! A card is one fact unit (front/back content) plus the scheduling fields
//! the review engine reads and rewrites. The core never persists cards --
//! the storage collaborator owns them and hands plain values in and out.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Milliseconds in one day. Intervals are whole days; timestamps epoch ms.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Shortest allowed review interval.
pub const MIN_INTERVAL_DAYS: i64 = 1;

/// Longest allowed review interval.
pub const MAX_INTERVAL_DAYS: i64 = 365;

/// Floor for the ease factor. Reviews never push a card below this.
pub const MIN_EASE_FACTOR: f64 = 1.1;

/// Ease factor assigned to cards that have never been reviewed.
pub const DEFAULT_EASE_FACTOR: f64 = 2.3;

/// Manual pin forcing a card into recurring review, independent of due-ness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    Daily,
    Weekly,
}

impl Pinned {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pinned::Daily => "daily",
            Pinned::Weekly => "weekly",
        }
    }
}

/// Scheduling fields of a single card.
///
/// The scheduler borrows a state immutably and returns a fresh value; it
/// never mutates in place. Invariants the scheduler maintains and that
/// loaded states must already satisfy:
///
/// - `MIN_INTERVAL_DAYS <= interval_days <= MAX_INTERVAL_DAYS`
/// - `ease_factor >= MIN_EASE_FACTOR`
/// - `next_due_at == last_reviewed_at + interval_days * DAY_MS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Days until the next review after a successful pass.
    pub interval_days: i64,
    /// Multiplier controlling how fast intervals grow.
    pub ease_factor: f64,
    /// Successful (non-lowest-confidence) reviews ever applied.
    pub review_count: u32,
    /// Consecutive lowest-confidence outcomes; cleared by any success.
    pub consecutive_fails: u32,
    /// Epoch ms of the last completed review, 0 if never reviewed.
    pub last_reviewed_at: i64,
    /// Epoch ms at which the card becomes due again.
    pub next_due_at: i64,
}

impl MemoryState {
    /// State for a card that has never been reviewed.
    pub fn fresh() -> Self {
        Self {
            interval_days: 1,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            consecutive_fails: 0,
            last_reviewed_at: 0,
            next_due_at: 0,
        }
    }

    /// Check the state invariants.
    ///
    /// Call this where records are constructed or loaded from storage; the
    /// scheduler assumes the invariants already hold and has no error path.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.interval_days < MIN_INTERVAL_DAYS || self.interval_days > MAX_INTERVAL_DAYS {
            return Err(StateError::IntervalOutOfRange {
                got: self.interval_days,
                min: MIN_INTERVAL_DAYS,
                max: MAX_INTERVAL_DAYS,
            });
        }
        if self.ease_factor < MIN_EASE_FACTOR {
            return Err(StateError::EaseBelowFloor {
                got: self.ease_factor,
                min: MIN_EASE_FACTOR,
            });
        }
        Ok(())
    }

    /// Whether the card is due for review at `now_ms`.
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.next_due_at <= now_ms
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// One fact unit with front/back content and a memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    /// Comma-separated labels, used only for filtering. Never mutated here.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub is_reversible: bool,
    #[serde(default)]
    pub pinned: Option<Pinned>,
    #[serde(flatten)]
    pub memory: MemoryState,
    /// Epoch ms when the card was created.
    pub created_at: i64,
}

impl Card {
    /// Create a card with fresh memory state.
    pub fn new(
        id: impl Into<String>,
        deck_id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            deck_id: deck_id.into(),
            front: front.into(),
            back: back.into(),
            tags: None,
            is_reversible: false,
            pinned: None,
            memory: MemoryState::fresh(),
            created_at,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        self.memory.is_due(now_ms)
    }

    /// Return a copy carrying the given post-review memory state.
    pub fn with_memory(&self, memory: MemoryState) -> Self {
        Self {
            memory,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_defaults() {
        let state = MemoryState::fresh();
        assert_eq!(state.interval_days, 1);
        assert_eq!(state.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(state.review_count, 0);
        assert_eq!(state.consecutive_fails, 0);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_rejects_interval_out_of_range() {
        let mut state = MemoryState::fresh();
        state.interval_days = 0;
        assert!(matches!(
            state.validate(),
            Err(StateError::IntervalOutOfRange { got: 0, .. })
        ));

        state.interval_days = 366;
        assert!(matches!(
            state.validate(),
            Err(StateError::IntervalOutOfRange { got: 366, .. })
        ));
    }

    #[test]
    fn validate_rejects_ease_below_floor() {
        let mut state = MemoryState::fresh();
        state.ease_factor = 1.0;
        assert!(matches!(
            state.validate(),
            Err(StateError::EaseBelowFloor { .. })
        ));
    }

    #[test]
    fn due_comparison_is_inclusive() {
        let mut state = MemoryState::fresh();
        state.next_due_at = 1_000;
        assert!(state.is_due(1_000));
        assert!(state.is_due(1_001));
        assert!(!state.is_due(999));
    }

    #[test]
    fn pinned_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Pinned::Daily).unwrap(), "\"daily\"");
        assert_eq!(
            serde_json::to_string(&Pinned::Weekly).unwrap(),
            "\"weekly\""
        );
        assert_eq!(Pinned::Daily.as_str(), "daily");
    }

    #[test]
    fn card_json_shape_is_flat() {
        let card = Card::new("c1", "d1", "front", "back", 42);
        let value = serde_json::to_value(&card).unwrap();
        // Memory fields sit beside the content fields, as stored records do.
        assert_eq!(value["interval_days"], 1);
        assert_eq!(value["deck_id"], "d1");
        assert_eq!(value["created_at"], 42);
    }
}
