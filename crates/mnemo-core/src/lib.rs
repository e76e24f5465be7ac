//! # Mnemo Core Library
//!
//! This library provides the review core for Mnemo, a spaced-repetition
//! flashcard system: the scheduling engine that adapts review intervals to
//! recall quality, the session selector that decides which cards enter a
//! review pass, and the audit records each completed review produces.
//!
//! Everything here is synchronous, side-effect-free, and in-memory. Card
//! storage, import/export, backups, and presentation are external
//! collaborators: they hand plain record values in and persist or render
//! the plain values handed back.
//!
//! ## Key Components
//!
//! - [`ReviewScheduler`]: pure next-state/next-due computation per review
//! - [`select_cards`] / [`SessionSpec`]: filtered session selection
//! - [`record_review`]: audit-record construction for the review history
//! - [`Card`] / [`MemoryState`]: the record shapes the collaborators own

pub mod card;
pub mod error;
pub mod history;
pub mod scheduler;
pub mod session;
pub mod stats;

pub use card::{Card, MemoryState, Pinned, DAY_MS, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, MIN_INTERVAL_DAYS};
pub use error::{SpecViolation, StateError};
pub use history::{record_review, ReviewHistoryRecord};
pub use scheduler::{
    Confidence, ResponseSpeed, ReviewOutcome, ReviewScheduler, SchedulerConfig,
};
pub use session::{
    select_cards, select_cards_at, PinnedFilter, SessionKind, SessionResult, SessionSpec,
};
pub use stats::{analyze_decks, due_card_count, DeckAnalytics};
