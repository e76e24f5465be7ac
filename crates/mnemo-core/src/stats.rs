//! Per-deck analytics over an in-memory card pool.
//!
//! Backs the deck list view: how many cards a deck holds and how many are
//! waiting for review right now.

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Card and due counts for one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckAnalytics {
    pub deck_id: String,
    pub card_count: usize,
    pub due_count: usize,
}

/// Compute analytics for each requested deck, in the requested order.
///
/// Decks with no cards in the pool report zero counts.
pub fn analyze_decks(cards: &[Card], deck_ids: &[String], now_ms: i64) -> Vec<DeckAnalytics> {
    deck_ids
        .iter()
        .map(|deck_id| {
            let mut card_count = 0;
            let mut due_count = 0;
            for card in cards.iter().filter(|c| &c.deck_id == deck_id) {
                card_count += 1;
                if card.is_due(now_ms) {
                    due_count += 1;
                }
            }
            DeckAnalytics {
                deck_id: deck_id.clone(),
                card_count,
                due_count,
            }
        })
        .collect()
}

/// Total due cards across the given decks.
pub fn due_card_count(cards: &[Card], deck_ids: &[String], now_ms: i64) -> usize {
    cards
        .iter()
        .filter(|c| deck_ids.contains(&c.deck_id) && c.is_due(now_ms))
        .count()
}
