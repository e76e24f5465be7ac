//! Integration tests for the full review pass.
//!
//! These tests walk the complete workflow an embedding application runs:
//! select a session over a card pool, schedule each reviewed card, and
//! build the audit record for every completed review.

use mnemo_core::{
    analyze_decks, record_review, select_cards_at, Card, Confidence, MemoryState, Pinned,
    PinnedFilter, ReviewOutcome, ReviewScheduler, SessionKind, SessionSpec, DAY_MS,
};

const NOW: i64 = 1_700_000_000_000;

fn spec(kind: SessionKind) -> SessionSpec {
    SessionSpec {
        session_id: "session-1".to_string(),
        name: "Evening review".to_string(),
        deck_ids: vec!["spanish".to_string(), "geography".to_string()],
        kind,
        created_at: NOW,
    }
}

fn pool() -> Vec<Card> {
    let mut cards = vec![
        Card::new("es-hola", "spanish", "hola", "hello", NOW - 30 * DAY_MS),
        Card::new("es-adios", "spanish", "adios", "goodbye", NOW - 30 * DAY_MS),
        Card::new("geo-paris", "geography", "France", "Paris", NOW - 10 * DAY_MS),
    ];
    cards[0].tags = Some("greeting,basic".to_string());
    cards[1].tags = Some("greeting".to_string());
    cards[1].pinned = Some(Pinned::Daily);
    cards[2].tags = Some("capital".to_string());

    // Two cards overdue, one scheduled out a week.
    cards[0].memory.next_due_at = NOW - DAY_MS;
    cards[1].memory.next_due_at = NOW;
    cards[2].memory = MemoryState {
        interval_days: 7,
        ease_factor: 2.3,
        review_count: 4,
        consecutive_fails: 0,
        last_reviewed_at: NOW - DAY_MS,
        next_due_at: NOW + 6 * DAY_MS,
    };
    cards
}

#[test]
fn due_session_reviews_and_records_each_card() {
    let scheduler = ReviewScheduler::new();
    let result = select_cards_at(pool(), spec(SessionKind::DueCards), NOW);

    assert_eq!(result.total_cards, 2);
    assert_eq!(result.due_cards, 2);
    assert_eq!(result.pinned_cards, 1);

    let outcomes = [
        ReviewOutcome::timed(Confidence::Knew, 4_000),
        ReviewOutcome::new(Confidence::Forgot),
    ];

    let mut updated = Vec::new();
    let mut records = Vec::new();
    for (card, outcome) in result.cards.iter().zip(&outcomes) {
        let (next, due) = scheduler.next_review_at(&card.memory, outcome, NOW);
        assert!(next.validate().is_ok());
        assert_eq!(due - next.last_reviewed_at, next.interval_days * DAY_MS);

        records.push(record_review(&card.id, &card.memory, &next, outcome, NOW));
        updated.push(card.with_memory(next));
    }

    // First card succeeded at its first review: day 1 baseline, fast bonus.
    assert_eq!(updated[0].memory.review_count, 1);
    assert_eq!(updated[0].memory.interval_days, 1);
    // Second card lapsed: interval reset, streak started, ease untouched.
    assert_eq!(updated[1].memory.interval_days, 1);
    assert_eq!(updated[1].memory.consecutive_fails, 1);
    assert_eq!(updated[1].memory.review_count, 0);

    assert_eq!(records[0].confidence, "knew");
    assert_eq!(records[0].response_time_ms, 4_000);
    assert_eq!(records[1].confidence, "forgot");
    assert_eq!(records[1].response_time_ms, 0);
    for record in &records {
        assert_eq!(record.reviewed_at, NOW);
        assert_eq!(record.old_interval_days, 1);
        assert_eq!(record.new_interval_days, 1);
    }
}

#[test]
fn repeated_lapses_walk_ease_down_to_the_floor() {
    let scheduler = ReviewScheduler::new();
    let mut state = MemoryState {
        interval_days: 40,
        ease_factor: 1.4,
        review_count: 12,
        consecutive_fails: 0,
        last_reviewed_at: NOW - 40 * DAY_MS,
        next_due_at: NOW,
    };

    let mut now = NOW;
    for _ in 0..5 {
        let (next, _) = scheduler.next_review_at(&state, &ReviewOutcome::new(Confidence::Forgot), now);
        state = next;
        now += DAY_MS;
    }

    // First lapse is free; the rest subtract 0.15 down to the 1.1 floor.
    assert!((state.ease_factor - 1.1).abs() < 1e-9);
    assert_eq!(state.consecutive_fails, 5);
    assert_eq!(state.interval_days, 1);
    assert_eq!(state.review_count, 12);
    assert!(state.validate().is_ok());
}

#[test]
fn recovery_after_lapse_restarts_the_warm_up() {
    let scheduler = ReviewScheduler::new();
    let seasoned = MemoryState {
        interval_days: 20,
        ease_factor: 2.0,
        review_count: 8,
        consecutive_fails: 0,
        last_reviewed_at: NOW - 20 * DAY_MS,
        next_due_at: NOW,
    };

    let (lapsed, _) =
        scheduler.next_review_at(&seasoned, &ReviewOutcome::new(Confidence::Forgot), NOW);
    assert_eq!(lapsed.interval_days, 1);

    // The next success leaves the warm-up behind: the card still has
    // review history, so the base comes from interval * ease.
    let (recovered, _) = scheduler.next_review_at(
        &lapsed,
        &ReviewOutcome::timed(Confidence::Knew, 8_000),
        NOW + DAY_MS,
    );
    assert_eq!(recovered.interval_days, 2); // round(1 * 2.0)
    assert_eq!(recovered.consecutive_fails, 0);
    assert_eq!(recovered.review_count, 9);
}

#[test]
fn pinned_session_ignores_due_times() {
    let result = select_cards_at(
        pool(),
        spec(SessionKind::PinnedOnly {
            filter: PinnedFilter::AllPinned,
        }),
        NOW - 10 * DAY_MS,
    );

    assert_eq!(result.total_cards, 1);
    assert_eq!(result.cards[0].id, "es-adios");
    // At this earlier timestamp the pinned card is not yet due.
    assert_eq!(result.due_cards, 0);
}

#[test]
fn invalid_spec_still_selects_but_reports_violations() {
    let bad = SessionSpec {
        session_id: "session-2".to_string(),
        name: "".to_string(),
        deck_ids: vec![],
        kind: SessionKind::AllCards,
        created_at: NOW,
    };
    let violations = bad.validate();
    assert_eq!(violations.len(), 2);

    // Selection itself is total; blocking on violations is the caller's call.
    let result = select_cards_at(pool(), bad, NOW);
    assert_eq!(result.total_cards, 3);
}

#[test]
fn deck_analytics_reflect_scheduling_progress() {
    let scheduler = ReviewScheduler::new();
    let mut cards = pool();
    let decks = vec!["spanish".to_string(), "geography".to_string()];

    let before = analyze_decks(&cards, &decks, NOW);
    assert_eq!(before[0].card_count, 2);
    assert_eq!(before[0].due_count, 2);
    assert_eq!(before[1].due_count, 0);

    // Review the overdue Spanish cards successfully.
    for card in cards.iter_mut().filter(|c| c.deck_id == "spanish") {
        let (next, _) = scheduler.next_review_at(
            &card.memory,
            &ReviewOutcome::timed(Confidence::Instant, 2_000),
            NOW,
        );
        card.memory = next;
    }

    let after = analyze_decks(&cards, &decks, NOW);
    assert_eq!(after[0].card_count, 2);
    assert_eq!(after[0].due_count, 0);
}
