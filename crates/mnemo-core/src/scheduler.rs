//! Review scheduling engine.
//!
//! Given a card's memory state and a review outcome, compute the next state
//! and due time. The engine is a pure interval calculator: it holds no
//! mutable state, performs no I/O, and never fails. Reviews of different
//! cards may therefore be computed concurrently without coordination; the
//! caller serializes writes of the same card.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::card::{MemoryState, DAY_MS, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, MIN_INTERVAL_DAYS};

/// Ease reduction applied on the second consecutive lapse.
const EASE_PENALTY: f64 = 0.15;

/// Base interval for the first-ever successful review (days).
const FIRST_REVIEW_BASE: f64 = 1.0;

/// Base interval for the second successful review (days).
const SECOND_REVIEW_BASE: f64 = 3.0;

/// Responses faster than this count as fast recall (ms).
const FAST_RESPONSE_MS: i64 = 5_000;

/// Responses slower than this count as slow recall (ms).
const SLOW_RESPONSE_MS: i64 = 15_000;

/// How well the learner recalled a card, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Failed to recall. A lapse: resets the interval, counts the fail streak.
    Forgot,
    /// Recalled with effort.
    Hard,
    /// Recalled normally.
    Knew,
    /// Recalled immediately.
    Instant,
}

impl Confidence {
    /// Interval multiplier applied on the successful branch.
    pub fn multiplier(&self) -> f64 {
        match self {
            Confidence::Forgot => 0.0,
            Confidence::Hard => 0.8,
            Confidence::Knew => 1.0,
            Confidence::Instant => 1.3,
        }
    }

    /// Stable label stored in review history records.
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Forgot => "forgot",
            Confidence::Hard => "hard",
            Confidence::Knew => "knew",
            Confidence::Instant => "instant",
        }
    }
}

/// Latency tier of a recorded response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSpeed {
    /// Under 5 seconds.
    Fast,
    /// 5 to 15 seconds inclusive.
    Normal,
    /// Over 15 seconds.
    Slow,
}

impl ResponseSpeed {
    /// Classify a raw response time in milliseconds.
    pub fn classify(response_time_ms: i64) -> Self {
        if response_time_ms < FAST_RESPONSE_MS {
            ResponseSpeed::Fast
        } else if response_time_ms <= SLOW_RESPONSE_MS {
            ResponseSpeed::Normal
        } else {
            ResponseSpeed::Slow
        }
    }

    /// Interval modifier for this tier.
    pub fn modifier(&self) -> f64 {
        match self {
            ResponseSpeed::Fast => 1.1,
            ResponseSpeed::Normal => 1.0,
            ResponseSpeed::Slow => 0.85,
        }
    }
}

/// Outcome of a single review: a confidence rank plus optional latency.
///
/// `response_time_ms` is `None` when latency tracking is disabled in the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub confidence: Confidence,
    #[serde(default)]
    pub response_time_ms: Option<i64>,
}

impl ReviewOutcome {
    /// Outcome without a latency reading.
    pub fn new(confidence: Confidence) -> Self {
        Self {
            confidence,
            response_time_ms: None,
        }
    }

    /// Outcome with a measured response time.
    pub fn timed(confidence: Confidence, response_time_ms: i64) -> Self {
        Self {
            confidence,
            response_time_ms: Some(response_time_ms),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether response time modifies the computed interval.
    pub use_response_time: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            use_response_time: true,
        }
    }
}

/// Stateless scheduling service.
///
/// Carries only its configuration; construct one wherever reviews complete
/// and share it freely. All methods borrow the input state and return a new
/// value.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Compute the next state and due time using the wall clock.
    pub fn next_review(
        &self,
        state: &MemoryState,
        outcome: &ReviewOutcome,
    ) -> (MemoryState, i64) {
        self.next_review_at(state, outcome, Utc::now().timestamp_millis())
    }

    /// Compute the next state and due time at an explicit timestamp.
    ///
    /// Total and deterministic given `now_ms`. The returned state satisfies
    /// the [`MemoryState`] invariants whenever the input does, and
    /// `next_due_at - last_reviewed_at == interval_days * DAY_MS` holds
    /// exactly.
    pub fn next_review_at(
        &self,
        state: &MemoryState,
        outcome: &ReviewOutcome,
        now_ms: i64,
    ) -> (MemoryState, i64) {
        match outcome.confidence {
            Confidence::Forgot => self.lapse(state, now_ms),
            _ => self.advance(state, outcome, now_ms),
        }
    }

    /// Lowest-confidence branch: reset the interval, track the fail streak.
    ///
    /// A single miss is treated as noise; the ease penalty starts on the
    /// second consecutive lapse. Response time is never consulted here, and
    /// a lapse does not count as a successful review.
    fn lapse(&self, state: &MemoryState, now_ms: i64) -> (MemoryState, i64) {
        let consecutive_fails = state.consecutive_fails + 1;
        let ease_factor = if consecutive_fails >= 2 {
            (state.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR)
        } else {
            state.ease_factor
        };

        let next = MemoryState {
            interval_days: MIN_INTERVAL_DAYS,
            ease_factor,
            review_count: state.review_count,
            consecutive_fails,
            last_reviewed_at: now_ms,
            next_due_at: now_ms + MIN_INTERVAL_DAYS * DAY_MS,
        };
        let due = next.next_due_at;
        (next, due)
    }

    /// Successful branch: grow the interval from the review history.
    ///
    /// The first two reviews use fixed 1-day and 3-day baselines so the ease
    /// multiplier cannot compound before the card has produced any signal.
    fn advance(
        &self,
        state: &MemoryState,
        outcome: &ReviewOutcome,
        now_ms: i64,
    ) -> (MemoryState, i64) {
        let base = match state.review_count {
            0 => FIRST_REVIEW_BASE,
            1 => SECOND_REVIEW_BASE,
            _ => (state.interval_days as f64 * state.ease_factor).round(),
        };

        let mut interval = base * outcome.confidence.multiplier();

        if self.config.use_response_time {
            if let Some(ms) = outcome.response_time_ms {
                interval *= ResponseSpeed::classify(ms).modifier();
            }
        }

        let interval_days = interval
            .clamp(MIN_INTERVAL_DAYS as f64, MAX_INTERVAL_DAYS as f64)
            .round() as i64;

        let next = MemoryState {
            interval_days,
            ease_factor: state.ease_factor,
            review_count: state.review_count + 1,
            consecutive_fails: 0,
            last_reviewed_at: now_ms,
            next_due_at: now_ms + interval_days * DAY_MS,
        };
        let due = next.next_due_at;
        (next, due)
    }
}
