//! Error types for mnemo-core.
//!
//! The scheduling and selection paths are total and have no error channel.
//! The two fallible surfaces are memory-state construction/loading
//! ([`StateError`]) and session-spec validation ([`SpecViolation`], returned
//! as a list so callers decide whether to block session creation).

use thiserror::Error;

/// A memory state that violates the scheduling invariants.
///
/// Raised where records are constructed or loaded from storage -- never
/// inside the scheduler, which assumes the invariants already hold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("interval_days must be between {min} and {max}, got {got}")]
    IntervalOutOfRange { got: i64, min: i64, max: i64 },

    #[error("ease_factor must be at least {min}, got {got}")]
    EaseBelowFloor { got: f64, min: f64 },
}

/// A violated precondition in a session specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecViolation {
    #[error("At least one deck must be selected")]
    NoDecksSelected,

    #[error("Session name cannot be empty")]
    BlankName,

    #[error("Tag filter cannot be empty for tag filter sessions")]
    BlankTagFilter,
}
