//! Session selection over an in-memory card pool.
//!
//! A session is one bounded review pass over a filtered subset of cards.
//! The selector reads due-ness, pin state, and tags; it never calls the
//! scheduler and never mutates a card. The storage collaborator fetches the
//! pool for the decks a spec names and hands it in as plain values.

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{Card, Pinned};
use crate::error::SpecViolation;

/// Which pinned cards a `PinnedOnly` session includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinnedFilter {
    Daily,
    Weekly,
    /// Any card with a pin, daily or weekly.
    AllPinned,
}

impl PinnedFilter {
    fn matches(&self, pinned: Option<Pinned>) -> bool {
        match self {
            PinnedFilter::Daily => pinned == Some(Pinned::Daily),
            PinnedFilter::Weekly => pinned == Some(Pinned::Weekly),
            PinnedFilter::AllPinned => pinned.is_some(),
        }
    }
}

/// What a session reviews, with the payload each kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionKind {
    /// Every card in the pool.
    AllCards,
    /// Cards whose `next_due_at` has passed.
    DueCards,
    /// Pinned cards matching the filter.
    PinnedOnly { filter: PinnedFilter },
    /// Cards whose tag string contains `tag`, case-insensitively.
    ///
    /// The match runs against the raw comma-joined tag string, so a filter
    /// may hit the middle of a tag name.
    TagFilter { tag: String },
}

/// Immutable description of one review session.
///
/// Created once, optionally validated, then consumed by [`select_cards`]
/// to produce exactly one [`SessionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub session_id: String,
    pub name: String,
    pub deck_ids: Vec<String>,
    pub kind: SessionKind,
    /// Epoch ms when the spec was created.
    pub created_at: i64,
}

impl SessionSpec {
    /// Build a spec with a generated session id and a wall-clock timestamp.
    pub fn new(name: impl Into<String>, deck_ids: Vec<String>, kind: SessionKind) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            name: name.into(),
            deck_ids,
            kind,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Quick session over every card in the given decks.
    pub fn all_cards(deck_ids: Vec<String>) -> Self {
        Self::new("All Cards", deck_ids, SessionKind::AllCards)
    }

    /// Quick session over cards that are currently due.
    pub fn due_cards(deck_ids: Vec<String>) -> Self {
        Self::new("Due Cards", deck_ids, SessionKind::DueCards)
    }

    /// Quick session over pinned cards.
    pub fn pinned(deck_ids: Vec<String>, filter: PinnedFilter) -> Self {
        Self::new("Pinned Cards", deck_ids, SessionKind::PinnedOnly { filter })
    }

    /// Quick session over cards matching a tag.
    pub fn tag_filter(deck_ids: Vec<String>, tag: impl Into<String>) -> Self {
        Self::new(
            "Tag Filter",
            deck_ids,
            SessionKind::TagFilter { tag: tag.into() },
        )
    }

    /// Check the spec's preconditions.
    ///
    /// Returns every violation rather than failing on the first; an empty
    /// list means the spec is valid. Callers decide whether a non-empty
    /// list blocks session creation.
    pub fn validate(&self) -> Vec<SpecViolation> {
        let mut violations = Vec::new();

        if self.deck_ids.is_empty() {
            violations.push(SpecViolation::NoDecksSelected);
        }
        if self.name.trim().is_empty() {
            violations.push(SpecViolation::BlankName);
        }
        if let SessionKind::TagFilter { tag } = &self.kind {
            if tag.trim().is_empty() {
                violations.push(SpecViolation::BlankTagFilter);
            }
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// The filtered card list plus counts computed over that list.
///
/// The counts describe the session the learner will actually see, not the
/// original pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub spec: SessionSpec,
    pub cards: Vec<Card>,
    pub total_cards: usize,
    pub due_cards: usize,
    pub pinned_cards: usize,
}

/// Select session cards using the wall clock for due-ness.
pub fn select_cards(cards: Vec<Card>, spec: SessionSpec) -> SessionResult {
    select_cards_at(cards, spec, Utc::now().timestamp_millis())
}

/// Select session cards at an explicit timestamp.
///
/// Pure given `now_ms`: filters the pool by the spec's kind, then computes
/// the counts over the filtered set. Pool order is preserved.
pub fn select_cards_at(cards: Vec<Card>, spec: SessionSpec, now_ms: i64) -> SessionResult {
    let filtered: Vec<Card> = match &spec.kind {
        SessionKind::AllCards => cards,
        SessionKind::DueCards => cards.into_iter().filter(|c| c.is_due(now_ms)).collect(),
        SessionKind::PinnedOnly { filter } => cards
            .into_iter()
            .filter(|c| filter.matches(c.pinned))
            .collect(),
        SessionKind::TagFilter { tag } => {
            if tag.trim().is_empty() {
                cards
            } else {
                let needle = tag.to_lowercase();
                cards
                    .into_iter()
                    .filter(|c| {
                        c.tags
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&needle))
                    })
                    .collect()
            }
        }
    };

    let due_cards = filtered.iter().filter(|c| c.is_due(now_ms)).count();
    let pinned_cards = filtered.iter().filter(|c| c.is_pinned()).count();
    let total_cards = filtered.len();

    debug!(
        "session '{}' selected {} cards ({} due, {} pinned)",
        spec.name, total_cards, due_cards, pinned_cards
    );

    SessionResult {
        spec,
        cards: filtered,
        total_cards,
        due_cards,
        pinned_cards,
    }
}
